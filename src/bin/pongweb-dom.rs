#![cfg_attr(target_arch = "wasm32", no_main)]

// Browser entry point for the Pong web client.
//
// index.html provides `<div id="app"></div>`; this module mounts the
// router into it once the wasm module is instantiated.

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use pongweb::api::HttpApi;
    use pongweb::config::WebConfig;
    use pongweb::debug;
    use pongweb::identity::GoogleIdentity;
    use pongweb::platform::WebHost;
    use pongweb::session::SessionStore;
    use pongweb::webshim::GisSdk;
    use pongweb::App;

    const CONTAINER_ID: &str = "app";

    thread_local! {
        // The page owns the app for its whole lifetime.
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn wasm_start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
        debug::init_from_url_and_storage_once();

        let config = WebConfig::from_build_env();
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        let api = HttpApi::new(config.absolute_api_base(&origin));

        let host = Rc::new(
            WebHost::new(CONTAINER_ID).map_err(|e| JsValue::from_str(&format!("{e:#}")))?,
        );
        let session = Rc::new(SessionStore::bootstrap(host.clone()));
        let identity = Rc::new(GoogleIdentity::new(Rc::new(GisSdk)));

        if config.client_id().is_none() {
            log::warn!("[config] PONG_GOOGLE_CLIENT_ID not set at build time; Google sign-in disabled");
        }

        let app = App::new(host, Rc::new(api), session, identity, config);
        app.start();
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        log::info!("[app] pong web client started");
        Ok(())
    }
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("pongweb-dom is only supported on wasm32 (browser) target.");
}
