//! Shared fakes for the integration tests: a scripted API, a manually
//! completed identity SDK, and a session that records `set_auth` calls.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

use pongweb::api::{ApiError, AuthApi};
use pongweb::config::WebConfig;
use pongweb::identity::{
    ButtonOptions, CredentialCallback, CredentialResponse, GoogleIdentity, IdentityError,
    IdentitySdk,
};
use pongweb::platform::{Host, MemoryHost};
use pongweb::router::normalize_path;
use pongweb::session::Session;
use pongweb::types::{AuthResponse, Credentials, Registration, User};
use pongweb::App;

pub const CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

pub fn user(email: &str, name: &str) -> User {
    User {
        id: 7,
        email: email.into(),
        display_name: Some(name.into()),
        two_factor_enabled: false,
    }
}

pub fn ok_auth(token: &str) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse::new(token, user("ada@example.com", "Ada")))
}

/// Answers every call with the configured result and records the call.
#[derive(Default)]
pub struct FakeApi {
    pub login: RefCell<Option<Result<AuthResponse, ApiError>>>,
    pub oauth: RefCell<Option<Result<AuthResponse, ApiError>>>,
    pub register: RefCell<Option<Result<(), ApiError>>>,
    pub verify: RefCell<Option<Result<AuthResponse, ApiError>>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn answer<T: Clone>(
        &self,
        call: String,
        slot: &RefCell<Option<Result<T, ApiError>>>,
    ) -> Result<T, ApiError> {
        self.calls.borrow_mut().push(call);
        slot.borrow()
            .clone()
            .unwrap_or_else(|| Err(ApiError::new("no scripted response")))
    }
}

#[async_trait(?Send)]
impl AuthApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.answer(format!("login {}", credentials.email), &self.login)
    }

    async fn oauth_google(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        self.answer(format!("oauth {id_token}"), &self.oauth)
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.answer(format!("register {}", registration.email), &self.register)
    }

    async fn verify_login_2fa(&self, email: &str, code: &str) -> Result<AuthResponse, ApiError> {
        self.answer(format!("2fa {email} {code}"), &self.verify)
    }
}

/// Script loads stay pending until the test calls [`FakeSdk::finish`].
#[derive(Default)]
pub struct FakeSdk {
    pub loads: Cell<usize>,
    pub inits: Cell<usize>,
    pub renders: Cell<usize>,
    available: Cell<bool>,
    pending: RefCell<Vec<oneshot::Sender<Result<(), IdentityError>>>>,
    callback: RefCell<Option<CredentialCallback>>,
}

impl FakeSdk {
    pub fn finish(&self, outcome: Result<(), IdentityError>) {
        for tx in self.pending.borrow_mut().drain(..) {
            let _ = tx.send(outcome.clone());
        }
        if outcome.is_ok() {
            self.available.set(true);
        }
    }

    /// Call the sign-in callback the way the SDK would.
    pub fn fire(&self, credential: Option<&str>) {
        let callback = self.callback.borrow().clone().expect("SDK was not initialized");
        callback(CredentialResponse {
            credential: credential.map(str::to_string),
        });
    }
}

impl IdentitySdk for FakeSdk {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), IdentityError>> {
        self.loads.set(self.loads.get() + 1);
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(tx);
        async move {
            rx.await
                .unwrap_or_else(|_| Err(IdentityError::ScriptLoad("dropped".into())))
        }
        .boxed_local()
    }

    fn initialize(&self, _: &str, callback: CredentialCallback) -> Result<(), IdentityError> {
        self.inits.set(self.inits.get() + 1);
        *self.callback.borrow_mut() = Some(callback);
        Ok(())
    }

    fn render_button(&self, _: &str, options: &ButtonOptions) -> Result<(), IdentityError> {
        assert_eq!(options, &ButtonOptions::default());
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }
}

/// In-memory session that remembers every `set_auth`.
#[derive(Default)]
pub struct RecordingSession {
    state: RefCell<Option<(String, User)>>,
    pub set_auth_calls: RefCell<Vec<(String, User)>>,
    pub clears: Cell<usize>,
}

impl RecordingSession {
    pub fn signed_in() -> Self {
        let session = Self::default();
        *session.state.borrow_mut() = Some(("t0".into(), user("ada@example.com", "Ada")));
        session
    }
}

impl Session for RecordingSession {
    fn set_auth(&self, token: String, user: User) {
        self.set_auth_calls
            .borrow_mut()
            .push((token.clone(), user.clone()));
        *self.state.borrow_mut() = Some((token, user));
    }

    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
        *self.state.borrow_mut() = None;
    }

    fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|(t, _)| t.clone())
    }

    fn user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|(_, u)| u.clone())
    }
}

pub struct Harness {
    pub host: Rc<MemoryHost>,
    pub api: Rc<FakeApi>,
    pub sdk: Rc<FakeSdk>,
    pub session: Rc<RecordingSession>,
    pub app: App,
}

impl Harness {
    /// Signed out, with a Google client id configured.
    pub fn new(hash: &str) -> Self {
        Self::with(hash, Some(CLIENT_ID), RecordingSession::default())
    }

    pub fn signed_in(hash: &str) -> Self {
        Self::with(hash, Some(CLIENT_ID), RecordingSession::signed_in())
    }

    pub fn with(hash: &str, client_id: Option<&str>, session: RecordingSession) -> Self {
        let host = Rc::new(MemoryHost::with_hash(hash));
        let api = Rc::new(FakeApi::default());
        let sdk = Rc::new(FakeSdk::default());
        let session = Rc::new(session);
        let config = WebConfig {
            google_client_id: client_id.map(str::to_string),
            ..WebConfig::default()
        };
        let app = App::new(
            host.clone(),
            api.clone(),
            session.clone(),
            Rc::new(GoogleIdentity::new(sdk.clone())),
            config,
        );
        Self {
            host,
            api,
            sdk,
            session,
            app,
        }
    }

    /// Current route path.
    pub fn path(&self) -> String {
        normalize_path(&self.host.location_hash())
    }

    /// Change the location and let the router and initializers run.
    pub fn go(&self, path: &str) {
        self.app.router().go(path);
        self.host.settle();
    }
}
