use std::rc::Rc;

use crate::api::AuthApi;
use crate::config::WebConfig;
use crate::debug::{self, cat};
use crate::identity::GoogleIdentity;
use crate::platform::Host;
use crate::router::{Navigation, Router};
use crate::routes;
use crate::session::Session;
use crate::views::game::GameController;
use crate::views::AppContext;

/// The whole client: shared context, route table and the game loop owner.
pub struct App {
    ctx: Rc<AppContext>,
    router: Rc<Router>,
    game: Rc<GameController>,
}

impl App {
    pub fn new(
        host: Rc<dyn Host>,
        api: Rc<dyn AuthApi>,
        session: Rc<dyn Session>,
        identity: Rc<GoogleIdentity>,
        config: WebConfig,
    ) -> Self {
        let router = Rc::new(Router::new(host.clone()));
        let ctx = Rc::new(AppContext {
            host: host.clone(),
            api,
            session,
            identity,
            config,
            epoch: router.epoch(),
        });
        let game = Rc::new(GameController::new(host));
        routes::register_routes(&router, &ctx, &game);
        Self { ctx, router, game }
    }

    /// Attach the location listener and mount the initial route.
    pub fn start(&self) -> Navigation {
        let nav = self.router.start();
        debug::log(cat::ROUTER, format!("started: {nav:?}"));
        nav
    }

    pub fn ctx(&self) -> &Rc<AppContext> {
        &self.ctx
    }

    pub fn router(&self) -> &Rc<Router> {
        &self.router
    }

    pub fn game(&self) -> &Rc<GameController> {
        &self.game
    }
}
