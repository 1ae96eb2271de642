//! Views: a pure `render()` producing markup, plus a deferred `init` that
//! wires the mounted DOM.
//!
//! `init` always runs a turn after its markup was mounted, and by then the
//! user may already have navigated away, or the same route may have been
//! mounted again. [`AppContext::schedule`] drops an initializer whose mount
//! is no longer current, so each mount is wired at most once. Async
//! responses that land after navigation write through [`Host`] calls that
//! are no-ops for missing elements.

use std::rc::Rc;

use crate::api::AuthApi;
use crate::config::WebConfig;
use crate::debug::{self, cat};
use crate::identity::GoogleIdentity;
use crate::platform::Host;
use crate::router::MountEpoch;
use crate::session::Session;

pub mod account;
pub mod dashboard;
pub mod game;
pub mod landing;
pub mod login;
pub mod register;
pub mod two_factor;

/// Short-lived hand-off from the login view to the 2FA verification view.
pub const PENDING_EMAIL_KEY: &str = "pendingEmail";

pub mod paths {
    pub const LANDING: &str = "/";
    pub const DASHBOARD: &str = "/dashboard";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const LOGIN_2FA: &str = "/login-2fa";
    pub const TWOFA: &str = "/twofa";
    pub const CHANGE_PASSWORD: &str = "/change-password";
    pub const FRIENDS: &str = "/friends";
    pub const GAME: &str = "/game";
}

/// Everything a view may touch, shared for the life of the page.
pub struct AppContext {
    pub host: Rc<dyn Host>,
    pub api: Rc<dyn AuthApi>,
    pub session: Rc<dyn Session>,
    pub identity: Rc<GoogleIdentity>,
    pub config: WebConfig,
    pub epoch: MountEpoch,
}

impl AppContext {
    /// Change the location hash; the router picks it up.
    pub fn navigate(&self, path: &str) {
        debug::log(cat::VIEW, format!("navigate {path}"));
        self.host.set_location_hash(&format!("#{path}"));
    }

    /// Run `init` after the markup that is about to be mounted is live.
    pub fn schedule(self: &Rc<Self>, init: fn(&Rc<AppContext>)) {
        let ctx = self.clone();
        self.defer_for_mount(move || init(&ctx));
    }

    /// Defer `task` to the next turn, skipping it if another mount happened
    /// in between.
    pub fn defer_for_mount(&self, task: impl FnOnce() + 'static) {
        let epoch = self.epoch.current();
        let current = self.epoch.clone();
        self.host.defer(Box::new(move || {
            if !current.is_current(epoch) {
                debug::log(cat::VIEW, format!("mount {epoch} replaced, skipping init"));
                return;
            }
            task();
        }));
    }

    /// Hide an inline error element and clear its text.
    pub fn hide_error(&self, id: &str) {
        self.host.set_text(id, "");
        self.host.set_style(id, "display", "none");
    }

    /// Show a message in an inline error element.
    pub fn show_error(&self, id: &str, message: &str) {
        if self.host.set_text(id, message) {
            self.host.set_style(id, "display", "block");
        }
    }
}

/// Initializer for pages that need a signed-in user.
pub fn require_auth(ctx: &Rc<AppContext>) {
    if !ctx.session.is_authenticated() {
        debug::log(cat::AUTH, "not signed in, redirecting to login");
        ctx.navigate(paths::LOGIN);
    }
}
