//! The application's route table.

use std::rc::Rc;

use crate::router::{RouteEntry, Router};
use crate::views::game::GameController;
use crate::views::{self, paths, AppContext};

/// Route titles, in registration order.
pub const TITLES: [(&str, &str); 9] = [
    (paths::LANDING, "Welcome"),
    (paths::DASHBOARD, "Dashboard"),
    (paths::LOGIN, "Login"),
    (paths::REGISTER, "Register"),
    (paths::LOGIN_2FA, "2FA Verify"),
    (paths::TWOFA, "2FA"),
    (paths::CHANGE_PASSWORD, "Change Password"),
    (paths::FRIENDS, "Friends"),
    (paths::GAME, "Pong Game"),
];

/// A route whose render schedules `init` once its markup is mounted.
fn page(
    ctx: &Rc<AppContext>,
    path: &'static str,
    title: &'static str,
    render: fn() -> String,
    init: fn(&Rc<AppContext>),
) -> RouteEntry {
    let ctx = ctx.clone();
    RouteEntry::new(path, title, move || {
        let markup = render();
        ctx.schedule(init);
        markup
    })
}

fn static_page(path: &'static str, title: &'static str, render: fn() -> String) -> RouteEntry {
    RouteEntry::new(path, title, render)
}

pub fn register_routes(router: &Router, ctx: &Rc<AppContext>, game: &Rc<GameController>) {
    let [landing, dashboard, login, register, login_2fa, twofa, change_password, friends, pong] =
        TITLES;

    router.register(static_page(landing.0, landing.1, views::landing::render));
    router.register(page(
        ctx,
        dashboard.0,
        dashboard.1,
        views::dashboard::render,
        views::dashboard::init,
    ));
    router.register(page(
        ctx,
        login.0,
        login.1,
        views::login::render,
        views::login::init,
    ));
    router.register(page(
        ctx,
        register.0,
        register.1,
        views::register::render,
        views::register::init,
    ));
    router.register(page(
        ctx,
        login_2fa.0,
        login_2fa.1,
        views::two_factor::render_verify,
        views::two_factor::init_verify,
    ));
    router.register(page(
        ctx,
        twofa.0,
        twofa.1,
        views::two_factor::render_setup,
        views::two_factor::init_setup,
    ));
    router.register(page(
        ctx,
        change_password.0,
        change_password.1,
        views::account::render_change_password,
        views::account::init_change_password,
    ));
    router.register(page(
        ctx,
        friends.0,
        friends.1,
        views::account::render_friends,
        views::account::init_friends,
    ));

    let game_ctx = ctx.clone();
    let start = game.clone();
    let stop = game.clone();
    router.register(
        RouteEntry::new(pong.0, pong.1, move || {
            let game = start.clone();
            game_ctx.defer_for_mount(move || {
                game.start();
            });
            views::game::render()
        })
        .with_cleanup(move || stop.stop()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_cover_every_path_once() {
        let mut paths: Vec<_> = TITLES.iter().map(|(p, _)| *p).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), TITLES.len());
        assert_eq!(TITLES[0], ("/", "Welcome"));
        assert_eq!(TITLES[8], ("/game", "Pong Game"));
    }
}
