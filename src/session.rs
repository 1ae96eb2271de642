//! Session state: the signed-in token and user.
//! - Lives in memory for the page's lifetime
//! - Persisted to local storage, keys: `pong.token`, `pong.user`
//! - `set_auth` is the only way in; views never touch storage keys directly
//! - Debug category: [pong][auth]
use std::cell::RefCell;
use std::rc::Rc;

use crate::debug::{self, cat};
use crate::platform::{Host, StorageArea};
use crate::types::User;

pub const TOKEN_KEY: &str = "pong.token";
pub const USER_KEY: &str = "pong.user";

pub trait Session {
    fn set_auth(&self, token: String, user: User);
    fn clear(&self);
    fn token(&self) -> Option<String>;
    fn user(&self) -> Option<User>;

    /// True if a non-empty token is present.
    fn is_authenticated(&self) -> bool {
        matches!(self.token().as_deref(), Some(t) if !t.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

pub struct SessionStore {
    host: Rc<dyn Host>,
    state: RefCell<SessionState>,
}

impl SessionStore {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            state: RefCell::new(SessionState::default()),
        }
    }

    /// Restore a previously persisted session, if any.
    pub fn bootstrap(host: Rc<dyn Host>) -> Self {
        let store = Self::new(host);
        let token = store
            .host
            .storage_get(StorageArea::Local, TOKEN_KEY)
            .filter(|t| !t.is_empty());
        let user = store
            .host
            .storage_get(StorageArea::Local, USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("[session] ignoring unreadable stored user: {e}");
                    None
                }
            });
        if let Some(token) = token {
            *store.state.borrow_mut() = SessionState {
                token: Some(token),
                user,
            };
            debug::log(cat::AUTH, "session restored from storage");
        }
        store
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn persist(&self) {
        let state = self.state.borrow();
        match &state.token {
            Some(token) => self.host.storage_set(StorageArea::Local, TOKEN_KEY, token),
            None => self.host.storage_remove(StorageArea::Local, TOKEN_KEY),
        }
        match state.user.as_ref().map(serde_json::to_string) {
            Some(Ok(json)) => self.host.storage_set(StorageArea::Local, USER_KEY, &json),
            Some(Err(e)) => log::warn!("[session] could not persist user: {e}"),
            None => self.host.storage_remove(StorageArea::Local, USER_KEY),
        }
    }
}

impl Session for SessionStore {
    fn set_auth(&self, token: String, user: User) {
        *self.state.borrow_mut() = SessionState {
            token: Some(token),
            user: Some(user),
        };
        debug::log(cat::AUTH, "token set");
        self.persist();
    }

    fn clear(&self) {
        *self.state.borrow_mut() = SessionState::default();
        debug::log(cat::AUTH, "token cleared");
        self.persist();
    }

    fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryHost;

    fn player() -> User {
        User {
            id: 42,
            email: "p@pong.dev".into(),
            display_name: Some("Paddle".into()),
            two_factor_enabled: false,
        }
    }

    #[test]
    fn set_auth_persists_and_bootstrap_restores() {
        let host = Rc::new(MemoryHost::new());
        let store = SessionStore::new(host.clone());
        assert!(!store.is_authenticated());

        store.set_auth("t1".into(), player());
        assert!(store.is_authenticated());
        assert_eq!(
            host.storage_get(StorageArea::Local, TOKEN_KEY).as_deref(),
            Some("t1")
        );

        let restored = SessionStore::bootstrap(host.clone());
        assert_eq!(restored.token().as_deref(), Some("t1"));
        assert_eq!(restored.user(), Some(player()));
    }

    #[test]
    fn clear_removes_persisted_keys() {
        let host = Rc::new(MemoryHost::new());
        let store = SessionStore::new(host.clone());
        store.set_auth("t1".into(), player());
        store.clear();
        assert!(!store.is_authenticated());
        assert_eq!(host.storage_get(StorageArea::Local, TOKEN_KEY), None);
        assert_eq!(host.storage_get(StorageArea::Local, USER_KEY), None);
        assert_eq!(SessionStore::bootstrap(host).snapshot(), SessionState::default());
    }

    #[test]
    fn bootstrap_tolerates_garbage_user() {
        let host = Rc::new(MemoryHost::new());
        host.storage_set(StorageArea::Local, TOKEN_KEY, "t9");
        host.storage_set(StorageArea::Local, USER_KEY, "{not json");
        let store = SessionStore::bootstrap(host);
        assert_eq!(store.token().as_deref(), Some("t9"));
        assert_eq!(store.user(), None);
    }
}
