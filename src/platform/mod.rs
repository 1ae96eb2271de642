//! Platform abstraction: everything the router and views need from the browser.
//!
//! Two hosts implement [`Host`]:
//! - [`WebHost`] (wasm32 only) talks to the real DOM through `web-sys`.
//! - [`MemoryHost`] keeps an in-memory document, used headlessly by the CLI
//!   and by tests.
//!
//! Element operations are keyed by DOM id and report `false` when the element
//! is not mounted. Views rely on that to stay no-ops after the user has
//! navigated elsewhere.

use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

mod memory;
pub use memory::MemoryHost;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod web;
        pub use web::WebHost;
    }
}

/// Named string fields of a submitted form.
pub type FormFields = HashMap<String, String>;

pub type SubmitHandler = Rc<dyn Fn(FormFields)>;
pub type ClickHandler = Rc<dyn Fn()>;
pub type Task = Box<dyn FnOnce() + 'static>;

/// Which web storage area a key lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Survives reloads (`localStorage`).
    Local,
    /// Short-lived, per tab (`sessionStorage`).
    Session,
}

/// Cancels its interval when dropped.
pub struct IntervalHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl IntervalHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for IntervalHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

pub trait Host {
    /// Raw location hash, including the leading `#` when present.
    fn location_hash(&self) -> String;
    fn set_location_hash(&self, hash: &str);
    /// Called on every location change for the lifetime of the process.
    fn on_location_change(&self, listener: Rc<dyn Fn()>);

    fn set_document_title(&self, title: &str);
    /// Replace the application container's content.
    fn mount(&self, markup: &str);

    fn has_element(&self, id: &str) -> bool;
    fn set_text(&self, id: &str, text: &str) -> bool;
    fn set_style(&self, id: &str, property: &str, value: &str) -> bool;
    /// Default submission is always prevented.
    fn on_submit(&self, form_id: &str, handler: SubmitHandler) -> bool;
    fn on_click(&self, id: &str, handler: ClickHandler) -> bool;

    fn alert(&self, message: &str);

    fn storage_get(&self, area: StorageArea, key: &str) -> Option<String>;
    fn storage_set(&self, area: StorageArea, key: &str, value: &str);
    fn storage_remove(&self, area: StorageArea, key: &str);

    /// Run `task` after the current turn, once freshly mounted markup is live.
    fn defer(&self, task: Task);
    fn spawn(&self, future: LocalBoxFuture<'static, ()>);
    fn start_interval(&self, millis: u32, tick: Box<dyn FnMut()>) -> IntervalHandle;
}

/// Read a form field, treating a missing one as empty.
pub fn field(fields: &FormFields, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}
