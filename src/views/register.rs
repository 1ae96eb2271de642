use std::rc::Rc;

use futures::FutureExt;

use super::{paths, AppContext};
use crate::platform::{field, FormFields};
use crate::types::Registration;

pub const FORM_ID: &str = "register-form";
pub const ERROR_ID: &str = "register-error";

pub fn render() -> String {
    r##"
<div class="login-wrapper">
  <div class="login-card">
    <h2>Register</h2>
    <form id="register-form" method="post" novalidate>
      <label for="reg-email">Email</label>
      <input type="email" id="reg-email" name="email" required />

      <label for="reg-name">Display name</label>
      <input type="text" id="reg-name" name="displayName" required />

      <label for="reg-password">Password</label>
      <input type="password" id="reg-password" name="password" required />

      <label for="reg-confirm">Confirm password</label>
      <input type="password" id="reg-confirm" name="confirm" required />

      <button type="submit" class="login-btn">Register</button>
    </form>
    <p class="register-text">Already registered? <a href="#/login">Login</a></p>
    <div id="register-error" class="login-error" style="display: none;"></div>
  </div>
</div>
"##
    .to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    Rejected(String),
}

pub fn init(ctx: &Rc<AppContext>) {
    let form_ctx = ctx.clone();
    ctx.host.on_submit(
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
}

/// Check the form locally before anything goes over the wire.
pub fn validate(fields: &FormFields) -> Result<Registration, String> {
    let email = field(fields, "email").trim().to_string();
    let display_name = field(fields, "displayName").trim().to_string();
    let password = field(fields, "password");
    let confirm = field(fields, "confirm");

    if email.is_empty() || display_name.is_empty() || password.is_empty() {
        return Err("All fields are required".into());
    }
    if password != confirm {
        return Err("Passwords do not match".into());
    }
    Ok(Registration {
        email,
        display_name,
        password,
    })
}

pub async fn submit(ctx: &Rc<AppContext>, fields: FormFields) -> RegisterOutcome {
    ctx.hide_error(ERROR_ID);
    let registration = match validate(&fields) {
        Ok(r) => r,
        Err(message) => {
            ctx.show_error(ERROR_ID, &message);
            return RegisterOutcome::Rejected(message);
        }
    };

    match ctx.api.register(&registration).await {
        Ok(()) => {
            ctx.navigate(paths::LOGIN);
            RegisterOutcome::Registered
        }
        Err(e) => {
            let message = if e.message.is_empty() {
                "Registration failed".to_string()
            } else {
                e.message
            };
            ctx.show_error(ERROR_ID, &message);
            RegisterOutcome::Rejected(message)
        }
    }
}
