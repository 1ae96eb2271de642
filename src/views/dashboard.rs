use std::rc::Rc;

use super::{paths, require_auth, AppContext};

pub const USER_ID: &str = "dashboard-user";
pub const LOGOUT_ID: &str = "logout-btn";

pub fn render() -> String {
    r##"
<div class="page dashboard">
  <header class="dashboard-header">
    <h1>Dashboard</h1>
    <span>Signed in as <strong id="dashboard-user"></strong></span>
    <button id="logout-btn" class="secondary-btn">Logout</button>
  </header>
  <nav class="dashboard-nav">
    <a href="#/game" class="primary-btn">Play Pong</a>
    <a href="#/friends">Friends</a>
    <a href="#/twofa">Two-factor authentication</a>
    <a href="#/change-password">Change password</a>
  </nav>
</div>
"##
    .to_string()
}

pub fn init(ctx: &Rc<AppContext>) {
    if !ctx.host.has_element(USER_ID) {
        return;
    }
    if !ctx.session.is_authenticated() {
        require_auth(ctx);
        return;
    }
    if let Some(user) = ctx.session.user() {
        ctx.host.set_text(USER_ID, user.label());
    }

    let logout_ctx = ctx.clone();
    ctx.host.on_click(
        LOGOUT_ID,
        Rc::new(move || {
            logout_ctx.session.clear();
            logout_ctx.navigate(paths::LANDING);
        }),
    );
}
