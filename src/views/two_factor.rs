//! Two-factor views.
//!
//! `/login-2fa` finishes a login the server parked behind a second factor;
//! the email comes from the login view through session storage.
//! `/twofa` is the settings page for enabling it.

use std::rc::Rc;

use futures::FutureExt;

use super::{paths, AppContext, PENDING_EMAIL_KEY};
use crate::platform::{field, FormFields, StorageArea};

pub const VERIFY_FORM_ID: &str = "twofa-login-form";
pub const VERIFY_ERROR_ID: &str = "twofa-login-error";
pub const VERIFY_EMAIL_ID: &str = "twofa-login-email";

pub fn render_verify() -> String {
    r##"
<div class="login-wrapper">
  <div class="login-card">
    <h2>2FA Verify</h2>
    <p>Enter the 6-digit code from your authenticator app for <strong id="twofa-login-email"></strong>.</p>
    <form id="twofa-login-form" method="post" novalidate>
      <label for="code">Code</label>
      <input type="text" id="code" name="code" inputmode="numeric" autocomplete="one-time-code" maxlength="6" required />
      <button type="submit" class="login-btn">Verify</button>
    </form>
    <p class="register-text"><a href="#/login">Back to login</a></p>
    <div id="twofa-login-error" class="login-error" style="display: none;"></div>
  </div>
</div>
"##
    .to_string()
}

pub fn render_setup() -> String {
    r##"
<div class="page">
  <h2>Two-Factor Authentication (2FA)</h2>
  <p>Protect your account with a code from an authenticator app.</p>
  <div id="twofa-setup" class="card">
    <p id="twofa-status">Scan the QR code in your authenticator app, then confirm with a code.</p>
  </div>
  <p><a href="#/dashboard">Back to dashboard</a></p>
</div>
"##
    .to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    SignedIn,
    Rejected(String),
    Incomplete,
}

pub fn init_verify(ctx: &Rc<AppContext>) {
    if !ctx.host.has_element(VERIFY_FORM_ID) {
        return;
    }
    let Some(email) = ctx
        .host
        .storage_get(StorageArea::Session, PENDING_EMAIL_KEY)
        .filter(|e| !e.is_empty())
    else {
        log::warn!("[2fa] no pending login, back to login");
        ctx.navigate(paths::LOGIN);
        return;
    };
    ctx.host.set_text(VERIFY_EMAIL_ID, &email);

    let form_ctx = ctx.clone();
    ctx.host.on_submit(
        VERIFY_FORM_ID,
        Rc::new(move |fields: FormFields| {
            let ctx = form_ctx.clone();
            let email = email.clone();
            form_ctx.host.spawn(
                async move {
                    verify(&ctx, &email, fields).await;
                }
                .boxed_local(),
            );
        }),
    );
}

pub async fn verify(ctx: &Rc<AppContext>, email: &str, fields: FormFields) -> VerifyOutcome {
    ctx.hide_error(VERIFY_ERROR_ID);
    let code = field(&fields, "code").trim().to_string();
    if code.is_empty() {
        let message = "Enter the code from your authenticator app".to_string();
        ctx.show_error(VERIFY_ERROR_ID, &message);
        return VerifyOutcome::Rejected(message);
    }

    match ctx.api.verify_login_2fa(email, &code).await {
        Ok(res) => match res.into_parts() {
            Some((token, user)) => {
                ctx.host.storage_remove(StorageArea::Session, PENDING_EMAIL_KEY);
                ctx.session.set_auth(token, user);
                ctx.navigate(paths::DASHBOARD);
                VerifyOutcome::SignedIn
            }
            None => VerifyOutcome::Incomplete,
        },
        Err(e) => {
            let message = if e.message.is_empty() {
                "Verification failed".to_string()
            } else {
                e.message
            };
            ctx.show_error(VERIFY_ERROR_ID, &message);
            VerifyOutcome::Rejected(message)
        }
    }
}

pub fn init_setup(ctx: &Rc<AppContext>) {
    if ctx.host.has_element("twofa-setup") {
        super::require_auth(ctx);
    }
}
