//! Pong web client: a hash-routed single-page app.
//!
//! The router swaps one application container between views; views render
//! markup, then wire their DOM in a deferred initializer. Everything the
//! browser provides is reached through [`platform::Host`], so the same code
//! runs in the page ([`platform::WebHost`], wasm32) and headless
//! ([`platform::MemoryHost`]) for the CLI and tests.
//!
//! ## Builds
//!
//! Browser bundle:
//! ```bash
//! PONG_GOOGLE_CLIENT_ID=... cargo build --target wasm32-unknown-unknown \
//!   --no-default-features --features dom-web --bin pongweb-dom
//! ```
//!
//! Native CLI:
//! ```bash
//! cargo run -- routes
//! cargo run -- render /login
//! ```

// Configuration and developer logging (all platforms)
pub mod config;
pub mod debug;

// Platform abstraction layer
pub mod platform;

// Router and route table
pub mod router;
pub mod routes;

// Collaborators: API client, session state, identity SDK
pub mod api;
pub mod identity;
pub mod session;
pub mod types;

// Views and the game board they animate
pub mod game;
pub mod views;

pub mod app;

// Google Identity Services bindings (browser only)
#[cfg(target_arch = "wasm32")]
pub mod webshim;

// Re-export commonly used types
pub use app::App;
pub use config::WebConfig;
pub use router::{Navigation, RouteEntry, Router};
