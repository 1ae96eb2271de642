// Native tooling for the Pong web client: inspect the route table and render
// routes headlessly against the in-memory host.

use std::rc::Rc;

use anyhow::Result;

use pongweb::api::HttpApi;
use pongweb::config::{self, Command, WebConfig};
use pongweb::debug;
use pongweb::identity::{GoogleIdentity, HeadlessSdk};
use pongweb::platform::{Host, MemoryHost};
use pongweb::router::{normalize_path, Navigation};
use pongweb::session::SessionStore;
use pongweb::App;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, command) = config::load()?;
    if let Some(list) = config.debug.as_deref() {
        debug::set_from_list(list);
    } else {
        debug::init_from_url_and_storage_once();
    }

    match command {
        Command::Routes => print_routes(config),
        Command::Render { path } => render(config, &path),
    }
}

fn build(config: WebConfig, host: Rc<MemoryHost>) -> App {
    let api = Rc::new(HttpApi::new(config.api_base_url.clone()));
    let session = Rc::new(SessionStore::bootstrap(host.clone()));
    let identity = Rc::new(GoogleIdentity::new(Rc::new(HeadlessSdk)));
    App::new(host, api, session, identity, config)
}

fn print_routes(config: WebConfig) -> Result<()> {
    let app = build(config, Rc::new(MemoryHost::new()));
    for entry in app.router().routes() {
        let cleanup = if entry.cleanup.is_some() { " (cleanup)" } else { "" };
        println!("{:<18} {}{}", entry.pattern, entry.title, cleanup);
    }
    Ok(())
}

/// What a headless render left in the document.
struct Rendered {
    landed: String,
    title: String,
    markup: String,
}

fn render_page(config: WebConfig, path: &str) -> Result<Rendered> {
    let host = Rc::new(MemoryHost::with_hash(&format!("#{}", normalize_path(path))));
    let app = build(config, host.clone());

    if let Navigation::NoMatch { path } = app.start() {
        anyhow::bail!("no route for {path}");
    }
    host.settle();

    let rendered = Rendered {
        landed: normalize_path(&host.location_hash()),
        title: host.title(),
        markup: host.container().trim().to_string(),
    };
    app.router().teardown();
    Ok(rendered)
}

fn render(config: WebConfig, path: &str) -> Result<()> {
    config.print_summary();
    let page = render_page(config, path)?;
    if page.landed != normalize_path(path) {
        eprintln!("redirected to {}", page.landed);
    }
    println!("title: {}", page.title);
    println!("{}", page.markup);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_dashboard_lands_on_login() {
        let page = render_page(WebConfig::default(), "dashboard").unwrap();
        assert_eq!(page.landed, "/login");
        assert_eq!(page.title, "Login");
        assert!(page.markup.contains("login-form"));
    }

    #[test]
    fn unknown_path_is_an_error() {
        assert!(render_page(WebConfig::default(), "/nowhere").is_err());
    }
}
