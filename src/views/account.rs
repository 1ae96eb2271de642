//! Signed-in account pages. Their only wiring is the sign-in guard.

use std::rc::Rc;

use super::{require_auth, AppContext};

pub const CHANGE_PASSWORD_ROOT: &str = "change-password-page";
pub const FRIENDS_ROOT: &str = "friends-page";

pub fn render_change_password() -> String {
    r##"
<div id="change-password-page" class="page">
  <h2>Change Password</h2>
  <form id="change-password-form" method="post" novalidate>
    <label for="current-password">Current password</label>
    <input type="password" id="current-password" name="currentPassword" required />
    <label for="new-password">New password</label>
    <input type="password" id="new-password" name="newPassword" required />
    <button type="submit" class="login-btn">Update</button>
  </form>
  <p><a href="#/dashboard">Back to dashboard</a></p>
</div>
"##
    .to_string()
}

pub fn render_friends() -> String {
    r##"
<div id="friends-page" class="page">
  <h2>Friends</h2>
  <ul id="friends-list" class="friends-list"></ul>
  <p><a href="#/dashboard">Back to dashboard</a></p>
</div>
"##
    .to_string()
}

/// Guard for pages identified by a root element id.
fn guard(ctx: &Rc<AppContext>, root_id: &str) {
    if ctx.host.has_element(root_id) {
        require_auth(ctx);
    }
}

pub fn init_change_password(ctx: &Rc<AppContext>) {
    guard(ctx, CHANGE_PASSWORD_ROOT);
}

pub fn init_friends(ctx: &Rc<AppContext>) {
    guard(ctx, FRIENDS_ROOT);
}
