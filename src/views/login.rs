//! Login view: email/password form plus the Google sign-in button.
//!
//! Password-flow errors are shown inline in `#login-error`; Google-flow
//! errors use a native alert. A "2FA" error parks the email in session
//! storage and moves on to the verification view.

use std::rc::Rc;

use futures::FutureExt;

use super::{paths, AppContext, PENDING_EMAIL_KEY};
use crate::debug::{self, cat};
use crate::identity::{ButtonOptions, CredentialCallback, CredentialResponse, IdentityError};
use crate::platform::{field, FormFields, StorageArea};
use crate::types::Credentials;

pub const FORM_ID: &str = "login-form";
pub const ERROR_ID: &str = "login-error";
pub const GOOGLE_BUTTON_ID: &str = "google-oauth";

pub fn render() -> String {
    r##"
<div class="login-wrapper">
  <div class="login-container">
    <a href="#/" class="login-home-link">
      <h1 class="login-main-title">TRANSCENDENCE<br><span>PONG 3D</span></h1>
    </a>
    <div class="login-card">
      <h2>Please Login</h2>
      <form id="login-form" method="post" novalidate>
        <label for="email">Email</label>
        <input type="email" id="email" name="email" placeholder="Enter email" required />

        <label for="password">Password</label>
        <input type="password" id="password" name="password" placeholder="Enter password" required />

        <button type="submit" class="login-btn">Login</button>

        <div id="google-oauth" class="google-oauth"></div>
      </form>

      <p class="register-text">
        Don't have an account? <a href="#/register">Register</a>
      </p>

      <div id="login-error" class="login-error" style="display: none;"></div>
    </div>
  </div>
</div>
"##
    .to_string()
}

/// How a password login attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn,
    SecondFactorRequired,
    Rejected(String),
    /// The server answered without a usable token/user pair.
    Incomplete,
}

/// How a Google credential exchange ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OAuthOutcome {
    SignedIn,
    Failed(String),
    Incomplete,
}

pub fn init(ctx: &Rc<AppContext>) {
    let form_ctx = ctx.clone();
    let attached = ctx.host.on_submit(
        FORM_ID,
        Rc::new(move |fields: FormFields| {
            let ctx = form_ctx.clone();
            form_ctx.host.spawn(
                async move {
                    submit(&ctx, fields).await;
                }
                .boxed_local(),
            );
        }),
    );
    if !attached {
        debug::log(cat::VIEW, "login form not mounted, skipping handlers");
    }

    setup_google_button(ctx);
}

pub async fn submit(ctx: &Rc<AppContext>, fields: FormFields) -> LoginOutcome {
    ctx.hide_error(ERROR_ID);
    let credentials = Credentials {
        email: field(&fields, "email"),
        password: field(&fields, "password"),
    };

    match ctx.api.login(&credentials).await {
        Ok(res) => match res.into_parts() {
            Some((token, user)) => {
                ctx.session.set_auth(token, user);
                ctx.navigate(paths::DASHBOARD);
                LoginOutcome::SignedIn
            }
            None => {
                log::warn!("[login] response without token/user; staying on login");
                LoginOutcome::Incomplete
            }
        },
        Err(e) if e.requires_second_factor() => {
            ctx.host
                .storage_set(StorageArea::Session, PENDING_EMAIL_KEY, &credentials.email);
            ctx.navigate(paths::LOGIN_2FA);
            LoginOutcome::SecondFactorRequired
        }
        Err(e) => {
            let message = if e.message.is_empty() {
                "Login failed".to_string()
            } else {
                e.message
            };
            ctx.show_error(ERROR_ID, &message);
            LoginOutcome::Rejected(message)
        }
    }
}

/// Hide the button slot, then load, initialize, and render the SDK button.
/// Without a client id only the Google button is abandoned.
pub fn setup_google_button(ctx: &Rc<AppContext>) {
    if !ctx.host.has_element(GOOGLE_BUTTON_ID) {
        return;
    }
    ctx.host.set_style(GOOGLE_BUTTON_ID, "visibility", "hidden");

    let Some(client_id) = ctx.config.client_id().map(str::to_string) else {
        log::error!("[login] missing Google client id (PONG_GOOGLE_CLIENT_ID); Google sign-in disabled");
        return;
    };

    let epoch = ctx.epoch.current();
    let task_ctx = ctx.clone();
    ctx.host.spawn(
        async move {
            if let Err(e) = mount_google_button(&task_ctx, &client_id, epoch).await {
                log::error!("[login] Google sign-in unavailable: {e}");
            }
        }
        .boxed_local(),
    );
}

/// Render into the mount current at `epoch`; a later mount, even of this
/// same view, renders its own button.
pub async fn mount_google_button(
    ctx: &Rc<AppContext>,
    client_id: &str,
    epoch: u64,
) -> Result<(), IdentityError> {
    ctx.identity.ensure_loaded().await?;
    if !ctx.epoch.is_current(epoch) || !ctx.host.has_element(GOOGLE_BUTTON_ID) {
        debug::log(cat::OAUTH, "left login before the SDK loaded");
        return Ok(());
    }
    ctx.identity
        .ensure_initialized(client_id, credential_callback(ctx))?;

    ctx.host.set_text(GOOGLE_BUTTON_ID, "");
    ctx.identity
        .render_button(GOOGLE_BUTTON_ID, &ButtonOptions::default())?;
    ctx.host.set_style(GOOGLE_BUTTON_ID, "visibility", "visible");
    Ok(())
}

/// The callback handed to the SDK at initialization.
pub fn credential_callback(ctx: &Rc<AppContext>) -> CredentialCallback {
    let ctx = ctx.clone();
    Rc::new(move |response: CredentialResponse| on_credential(&ctx, response))
}

/// A response without a credential is ignored.
pub fn on_credential(ctx: &Rc<AppContext>, response: CredentialResponse) {
    let Some(id_token) = response.credential.filter(|t| !t.is_empty()) else {
        debug::log(cat::OAUTH, "credential response without token, ignoring");
        return;
    };
    let task_ctx = ctx.clone();
    ctx.host.spawn(
        async move {
            complete_google_sign_in(&task_ctx, &id_token).await;
        }
        .boxed_local(),
    );
}

pub async fn complete_google_sign_in(ctx: &Rc<AppContext>, id_token: &str) -> OAuthOutcome {
    match ctx.api.oauth_google(id_token).await {
        Ok(res) => match res.into_parts() {
            Some((token, user)) => {
                ctx.session.set_auth(token, user);
                ctx.navigate(paths::DASHBOARD);
                OAuthOutcome::SignedIn
            }
            None => {
                log::warn!("[login] Google exchange returned no session");
                OAuthOutcome::Incomplete
            }
        },
        Err(e) => {
            let message = if e.message.is_empty() {
                "Google login failed".to_string()
            } else {
                e.message
            };
            ctx.host.alert(&message);
            OAuthOutcome::Failed(message)
        }
    }
}
