//! Browser host (wasm32): the real DOM through web-sys.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use futures::future::LocalBoxFuture;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, FormData, HtmlElement, HtmlFormElement, Storage, Window};

use super::{
    ClickHandler, FormFields, Host, IntervalHandle, StorageArea, SubmitHandler, Task,
};

pub struct WebHost {
    window: Window,
    document: Document,
    container: Element,
    // Listeners on the mounted view; released when the container is replaced.
    listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl WebHost {
    pub fn new(container_id: &str) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow!("window has no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| anyhow!("missing application container #{container_id}"))?;
        Ok(Self {
            window,
            document,
            container,
            listeners: RefCell::new(Vec::new()),
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn storage(&self, area: StorageArea) -> Option<Storage> {
        let storage = match area {
            StorageArea::Local => self.window.local_storage(),
            StorageArea::Session => self.window.session_storage(),
        };
        storage.ok().flatten()
    }

    fn listen(&self, id: &str, event: &str, mut handler: impl FnMut(Event) + 'static) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| handler(ev));
        if let Err(e) = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            log::warn!("[web] failed to attach {event} on #{id}: {e:?}");
            return false;
        }
        self.listeners.borrow_mut().push(closure);
        true
    }
}

impl Host for WebHost {
    fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_location_hash(&self, hash: &str) {
        if let Err(e) = self.window.location().set_hash(hash) {
            log::warn!("[web] failed to set location hash {hash}: {e:?}");
        }
    }

    fn on_location_change(&self, listener: Rc<dyn Fn()>) {
        let closure = Closure::<dyn FnMut()>::new(move || listener());
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
        {
            log::error!("[web] failed to attach hashchange listener: {e:?}");
        }
        closure.forget();
    }

    fn set_document_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn mount(&self, markup: &str) {
        self.listeners.borrow_mut().clear();
        self.container.set_inner_html(markup);
    }

    fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        match self.element(id) {
            Some(el) => {
                el.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) -> bool {
        let Some(el) = self.element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) else {
            return false;
        };
        el.style().set_property(property, value).is_ok()
    }

    fn on_submit(&self, form_id: &str, handler: SubmitHandler) -> bool {
        self.listen(form_id, "submit", move |ev: Event| {
            ev.prevent_default();
            let fields = ev
                .target()
                .and_then(|t| t.dyn_into::<HtmlFormElement>().ok())
                .map(|form| form_fields(&form))
                .unwrap_or_default();
            handler(fields);
        })
    }

    fn on_click(&self, id: &str, handler: ClickHandler) -> bool {
        self.listen(id, "click", move |_ev: Event| handler())
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn storage_get(&self, area: StorageArea, key: &str) -> Option<String> {
        self.storage(area)?.get_item(key).ok().flatten()
    }

    fn storage_set(&self, area: StorageArea, key: &str, value: &str) {
        if let Some(storage) = self.storage(area) {
            let _ = storage.set_item(key, value);
        }
    }

    fn storage_remove(&self, area: StorageArea, key: &str) {
        if let Some(storage) = self.storage(area) {
            let _ = storage.remove_item(key);
        }
    }

    fn defer(&self, task: Task) {
        Timeout::new(0, move || task()).forget();
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn start_interval(&self, millis: u32, mut tick: Box<dyn FnMut()>) -> IntervalHandle {
        let interval = Interval::new(millis, move || tick());
        IntervalHandle::new(move || drop(interval))
    }
}

/// String-valued entries of a form; file inputs are skipped.
fn form_fields(form: &HtmlFormElement) -> FormFields {
    let mut fields = FormFields::new();
    let Ok(data) = FormData::new_with_form(form) else {
        return fields;
    };
    let Ok(Some(entries)) = js_sys::try_iter(&data) else {
        return fields;
    };
    for entry in entries.flatten() {
        let pair = js_sys::Array::from(&entry);
        let key = pair.get(0).as_string();
        let value = pair.get(1).as_string();
        if let (Some(k), Some(v)) = (key, value) {
            fields.insert(k, v);
        }
    }
    fields
}
