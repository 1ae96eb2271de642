//! In-memory host: a headless document for the CLI and for tests.
//!
//! `mount` indexes the `id="..."` attributes of the markup, so element
//! lookups see exactly what is currently mounted. Location changes are
//! delivered through the deferred queue, the way a browser fires
//! `hashchange` after the current task.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use super::{
    ClickHandler, FormFields, Host, IntervalHandle, StorageArea, SubmitHandler, Task,
};

#[derive(Default)]
struct Element {
    text: String,
    styles: HashMap<String, String>,
    // Listeners accumulate like `addEventListener`; a remount drops them.
    submit: Vec<SubmitHandler>,
    click: Vec<ClickHandler>,
}

struct Ticker {
    active: Rc<Cell<bool>>,
    tick: Rc<RefCell<Box<dyn FnMut()>>>,
}

pub struct MemoryHost {
    hash: RefCell<String>,
    title: RefCell<String>,
    container: RefCell<String>,
    elements: RefCell<HashMap<String, Element>>,
    storage: RefCell<HashMap<(StorageArea, String), String>>,
    alerts: RefCell<Vec<String>>,
    location_listeners: RefCell<Vec<Rc<dyn Fn()>>>,
    deferred: RefCell<VecDeque<Task>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    tickers: RefCell<Vec<Ticker>>,
    mounts: Cell<usize>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            hash: RefCell::new(String::new()),
            title: RefCell::new(String::new()),
            container: RefCell::new(String::new()),
            elements: RefCell::new(HashMap::new()),
            storage: RefCell::new(HashMap::new()),
            alerts: RefCell::new(Vec::new()),
            location_listeners: RefCell::new(Vec::new()),
            deferred: RefCell::new(VecDeque::new()),
            pool: RefCell::new(pool),
            spawner,
            tickers: RefCell::new(Vec::new()),
            mounts: Cell::new(0),
        }
    }

    /// Start at a given hash without firing location listeners.
    pub fn with_hash(hash: &str) -> Self {
        let host = Self::new();
        *host.hash.borrow_mut() = with_hash_prefix(hash);
        host
    }

    pub fn container(&self) -> String {
        self.container.borrow().clone()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.get()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).map(|el| el.text.clone())
    }

    pub fn style(&self, id: &str, property: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(id)
            .and_then(|el| el.styles.get(property).cloned())
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.borrow().len()
    }

    pub fn active_intervals(&self) -> usize {
        self.tickers
            .borrow()
            .iter()
            .filter(|t| t.active.get())
            .count()
    }

    /// Dispatch a submit event to every handler on the form. Returns `false`
    /// if the form has none.
    pub fn submit(&self, form_id: &str, fields: &[(&str, &str)]) -> bool {
        let handlers = self
            .elements
            .borrow()
            .get(form_id)
            .map(|el| el.submit.clone())
            .unwrap_or_default();
        if handlers.is_empty() {
            return false;
        }
        let fields: FormFields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for handler in handlers {
            handler(fields.clone());
        }
        true
    }

    pub fn click(&self, id: &str) -> bool {
        let handlers = self
            .elements
            .borrow()
            .get(id)
            .map(|el| el.click.clone())
            .unwrap_or_default();
        for handler in &handlers {
            handler();
        }
        !handlers.is_empty()
    }

    /// Run the deferred tasks queued so far. Returns how many ran.
    pub fn flush_deferred(&self) -> usize {
        let batch: Vec<Task> = self.deferred.borrow_mut().drain(..).collect();
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }

    /// Poll spawned futures until none can make progress.
    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Alternate futures and deferred tasks until both are quiet.
    pub fn settle(&self) {
        for _ in 0..64 {
            self.run_until_stalled();
            if self.flush_deferred() == 0 {
                return;
            }
        }
        log::warn!("memory host did not settle after 64 rounds");
    }

    /// Fire every active interval once.
    pub fn tick_intervals(&self) {
        let ticks: Vec<_> = self
            .tickers
            .borrow()
            .iter()
            .filter(|t| t.active.get())
            .map(|t| (t.active.clone(), t.tick.clone()))
            .collect();
        for (active, tick) in ticks {
            if active.get() {
                (tick.borrow_mut())();
            }
        }
    }
}

impl Host for MemoryHost {
    fn location_hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn set_location_hash(&self, hash: &str) {
        let next = with_hash_prefix(hash);
        if *self.hash.borrow() == next {
            return;
        }
        *self.hash.borrow_mut() = next;
        let listeners: Vec<_> = self.location_listeners.borrow().clone();
        self.defer(Box::new(move || {
            for listener in listeners {
                listener();
            }
        }));
    }

    fn on_location_change(&self, listener: Rc<dyn Fn()>) {
        self.location_listeners.borrow_mut().push(listener);
    }

    fn set_document_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn mount(&self, markup: &str) {
        *self.container.borrow_mut() = markup.to_string();
        let elements = element_ids(markup)
            .into_iter()
            .map(|id| (id, Element::default()))
            .collect();
        *self.elements.borrow_mut() = elements;
        self.mounts.set(self.mounts.get() + 1);
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(el) => {
                el.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(el) => {
                el.styles.insert(property.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn on_submit(&self, form_id: &str, handler: SubmitHandler) -> bool {
        match self.elements.borrow_mut().get_mut(form_id) {
            Some(el) => {
                el.submit.push(handler);
                true
            }
            None => false,
        }
    }

    fn on_click(&self, id: &str, handler: ClickHandler) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(el) => {
                el.click.push(handler);
                true
            }
            None => false,
        }
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn storage_get(&self, area: StorageArea, key: &str) -> Option<String> {
        self.storage.borrow().get(&(area, key.to_string())).cloned()
    }

    fn storage_set(&self, area: StorageArea, key: &str, value: &str) {
        self.storage
            .borrow_mut()
            .insert((area, key.to_string()), value.to_string());
    }

    fn storage_remove(&self, area: StorageArea, key: &str) {
        self.storage.borrow_mut().remove(&(area, key.to_string()));
    }

    fn defer(&self, task: Task) {
        self.deferred.borrow_mut().push_back(task);
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(future) {
            log::error!("memory host failed to spawn future: {e}");
        }
    }

    fn start_interval(&self, _millis: u32, tick: Box<dyn FnMut()>) -> IntervalHandle {
        let active = Rc::new(Cell::new(true));
        let mut tickers = self.tickers.borrow_mut();
        tickers.retain(|t| t.active.get());
        tickers.push(Ticker {
            active: active.clone(),
            tick: Rc::new(RefCell::new(tick)),
        });
        IntervalHandle::new(move || active.set(false))
    }
}

/// Hashes are stored the way `location.hash` reports them.
fn with_hash_prefix(hash: &str) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{hash}")
    }
}

/// Collect `id="..."` attribute values from markup.
fn element_ids(markup: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut rest = markup;
    while let Some(pos) = rest.find("id=\"") {
        let is_attribute = rest[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let after = &rest[pos + 4..];
        if is_attribute {
            if let Some(end) = after.find('"') {
                ids.push(after[..end].to_string());
            }
        }
        rest = after;
    }
    ids
}
