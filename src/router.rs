//! Hash router for the single application container.
//!
//! Routes are matched against the normalized location hash in registration
//! order; the first full-string match wins.
//!
//! ## Transition
//!
//! On every navigation the router:
//! 1. runs the active view's cleanup, if it registered one (errors are logged,
//!    never propagated, so the next view always mounts),
//! 2. advances the [`MountEpoch`], renders the matched route and replaces
//!    the container's content,
//! 3. sets the document title,
//! 4. remembers the route's cleanup for the next transition.
//!
//! Views schedule their own initializers from inside `render` through
//! [`Host::defer`]; the router only guarantees the markup is mounted before
//! any deferred task can run. A deferred task captures the epoch current at
//! render time and must do nothing once a later mount has advanced it, even
//! when that mount is the same path.
//!
//! ## Path normalization
//!
//! - `#/login` and `/login` are the same path
//! - an empty hash is `/`
//! - a `?query` suffix is ignored for matching: `#/login?next=game` is `/login`
//!
//! ## Example
//!
//! ```rust,ignore
//! use pongweb::router::{RouteEntry, Router};
//!
//! let router = Router::new(host);
//! router.register(RouteEntry::new("/", "Welcome", || "<h1>hi</h1>".into()));
//! router.start();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::debug::{self, cat};
use crate::platform::Host;

pub type RenderFn = Rc<dyn Fn() -> String>;
pub type CleanupFn = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Strip a query suffix from a hash path.
#[inline]
fn strip_query(s: &str) -> &str {
    match s.find('?') {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Normalize a raw location hash into a route path.
pub fn normalize_path(raw_hash: &str) -> String {
    let s = raw_hash.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    let s = strip_query(s);
    if s.is_empty() {
        "/".to_string()
    } else {
        s.to_string()
    }
}

/// Full-string path matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern(String);

impl RoutePattern {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        self.0 == path
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoutePattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub title: String,
    pub render: RenderFn,
    pub cleanup: Option<CleanupFn>,
}

impl RouteEntry {
    pub fn new(
        pattern: impl Into<RoutePattern>,
        title: impl Into<String>,
        render: impl Fn() -> String + 'static,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            title: title.into(),
            render: Rc::new(render),
            cleanup: None,
        }
    }

    pub fn with_cleanup(mut self, cleanup: impl Fn() -> anyhow::Result<()> + 'static) -> Self {
        self.cleanup = Some(Rc::new(cleanup));
        self
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern)
            .field("title", &self.title)
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Result of one [`Router::navigate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Mounted { path: String, title: String },
    /// Nothing registered for `path`; the current view stays mounted.
    NoMatch { path: String },
}

/// Mount counter shared between the router and the views it renders.
#[derive(Clone, Debug, Default)]
pub struct MountEpoch(Rc<Cell<u64>>);

impl MountEpoch {
    pub fn current(&self) -> u64 {
        self.0.get()
    }

    /// True while no mount has happened since `epoch` was captured.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.0.get() == epoch
    }

    fn advance(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }
}

struct ActiveView {
    path: String,
    cleanup: Option<CleanupFn>,
}

pub struct Router {
    host: Rc<dyn Host>,
    routes: RefCell<Vec<RouteEntry>>,
    active: RefCell<Option<ActiveView>>,
    epoch: MountEpoch,
}

impl Router {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            routes: RefCell::new(Vec::new()),
            active: RefCell::new(None),
            epoch: MountEpoch::default(),
        }
    }

    /// Handle on the mount counter, advanced once per mounted view.
    pub fn epoch(&self) -> MountEpoch {
        self.epoch.clone()
    }

    /// Append a route. Earlier registrations win on overlap.
    pub fn register(&self, entry: RouteEntry) {
        debug::log(
            cat::ROUTER,
            format!("register {} ({})", entry.pattern, entry.title),
        );
        self.routes.borrow_mut().push(entry);
    }

    /// Registered routes in match order.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.routes.borrow().clone()
    }

    pub fn resolve(&self, path: &str) -> Option<RouteEntry> {
        self.routes
            .borrow()
            .iter()
            .find(|r| r.pattern.matches(path))
            .cloned()
    }

    /// Path of the mounted view, if any.
    pub fn active_path(&self) -> Option<String> {
        self.active.borrow().as_ref().map(|a| a.path.clone())
    }

    /// Listen for location changes and mount the initial route.
    pub fn start(self: &Rc<Self>) -> Navigation {
        let weak = Rc::downgrade(self);
        self.host.on_location_change(Rc::new(move || {
            if let Some(router) = weak.upgrade() {
                router.navigate();
            }
        }));
        self.navigate()
    }

    /// Change the location; the location listener performs the transition.
    pub fn go(&self, path: &str) {
        self.host.set_location_hash(&format!("#{}", normalize_path(path)));
    }

    /// Mount the route matching the current location.
    pub fn navigate(&self) -> Navigation {
        let path = normalize_path(&self.host.location_hash());
        let Some(entry) = self.resolve(&path) else {
            log::warn!("[router] no route for {path}");
            return Navigation::NoMatch { path };
        };

        self.run_active_cleanup();

        let epoch = self.epoch.advance();
        let markup = (entry.render)();
        self.host.mount(&markup);
        self.host.set_document_title(&entry.title);

        *self.active.borrow_mut() = Some(ActiveView {
            path: path.clone(),
            cleanup: entry.cleanup.clone(),
        });
        debug::log(
            cat::ROUTER,
            format!("mounted {path} ({}) epoch {epoch}", entry.title),
        );

        Navigation::Mounted {
            path,
            title: entry.title,
        }
    }

    /// Release the mounted view without replacing it.
    pub fn teardown(&self) {
        self.run_active_cleanup();
    }

    fn run_active_cleanup(&self) {
        // Taken before running so a cleanup can never fire twice.
        let Some(prev) = self.active.borrow_mut().take() else {
            return;
        };
        if let Some(cleanup) = prev.cleanup {
            debug::log(cat::ROUTER, format!("cleanup {}", prev.path));
            if let Err(e) = cleanup() {
                log::error!("[router] cleanup for {} failed: {e:#}", prev.path);
            }
        }
    }
}
