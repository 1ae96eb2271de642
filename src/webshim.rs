//! WASM-specific JavaScript bridge to Google Identity Services.
//!
//! This module provides Rust bindings for `window.google.accounts.id` and
//! the loader for its script tag. Only available when building for
//! WebAssembly targets.

#![cfg(target_arch = "wasm32")]

use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, HtmlElement, HtmlScriptElement};

use crate::identity::{
    ButtonOptions, CredentialCallback, CredentialResponse, IdentityError, IdentitySdk,
    GIS_SCRIPT_URL,
};

/// Marks the script tag so a second loader reuses it.
const SCRIPT_MARKER: &str = "data-gis";

#[wasm_bindgen]
extern "C" {
    // `catch` turns a missing SDK into an Err instead of a trap.
    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize, catch)]
    fn gis_initialize(config: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton, catch)]
    fn gis_render_button(parent: &HtmlElement, options: &JsValue) -> Result<(), JsValue>;
}

fn js_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

/// `window.google.accounts.id`, if present.
fn gis_namespace() -> Option<JsValue> {
    let win = window()?;
    let mut cur = JsValue::from(win);
    for key in ["google", "accounts", "id"] {
        cur = Reflect::get(&cur, &JsValue::from_str(key)).ok()?;
        if cur.is_undefined() || cur.is_null() {
            return None;
        }
    }
    Some(cur)
}

/// Browser implementation of [`IdentitySdk`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GisSdk;

impl GisSdk {
    fn script_promise() -> Result<Promise, IdentityError> {
        let doc = window()
            .and_then(|w| w.document())
            .ok_or_else(|| IdentityError::ScriptLoad("no document".into()))?;

        let existing = doc
            .query_selector(&format!("script[{SCRIPT_MARKER}]"))
            .ok()
            .flatten();

        let script: HtmlScriptElement = match existing {
            Some(el) => el
                .dyn_into()
                .map_err(|_| IdentityError::ScriptLoad("marker on a non-script element".into()))?,
            None => {
                let el: HtmlScriptElement = doc
                    .create_element("script")
                    .map_err(|e| IdentityError::ScriptLoad(js_message(&e)))?
                    .dyn_into()
                    .map_err(|_| IdentityError::ScriptLoad("createElement".into()))?;
                el.set_src(GIS_SCRIPT_URL);
                el.set_async(true);
                el.set_defer(true);
                let _ = el.set_attribute(SCRIPT_MARKER, "1");
                let head = doc
                    .head()
                    .ok_or_else(|| IdentityError::ScriptLoad("document has no <head>".into()))?;
                head.append_child(&el)
                    .map_err(|e| IdentityError::ScriptLoad(js_message(&e)))?;
                el
            }
        };

        let promise = Promise::new(&mut |resolve, reject| {
            let on_load = Closure::once(move || {
                let _ = resolve.call0(&JsValue::UNDEFINED);
            });
            let failed = script.clone();
            let on_error = Closure::once(move || {
                // Drop the dead tag so a retry injects a fresh one.
                failed.remove();
                let _ = reject.call1(
                    &JsValue::UNDEFINED,
                    &JsValue::from_str("identity script failed to load"),
                );
            });
            let _ = script
                .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
            let _ = script
                .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
            on_load.forget();
            on_error.forget();
        });
        Ok(promise)
    }
}

impl IdentitySdk for GisSdk {
    fn is_available(&self) -> bool {
        gis_namespace().is_some()
    }

    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), IdentityError>> {
        let promise = Self::script_promise();
        async move {
            let promise = promise?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| IdentityError::ScriptLoad(js_message(&e)))
        }
        .boxed_local()
    }

    fn initialize(
        &self,
        client_id: &str,
        callback: CredentialCallback,
    ) -> Result<(), IdentityError> {
        if gis_namespace().is_none() {
            return Err(IdentityError::Unavailable);
        }
        let on_credential = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
            let credential = Reflect::get(&response, &JsValue::from_str("credential"))
                .ok()
                .and_then(|v| v.as_string());
            callback(CredentialResponse { credential });
        });

        let config = Object::new();
        Reflect::set(&config, &"client_id".into(), &JsValue::from_str(client_id))
            .map_err(|e| IdentityError::Sdk(js_message(&e)))?;
        Reflect::set(&config, &"callback".into(), on_credential.as_ref())
            .map_err(|e| IdentityError::Sdk(js_message(&e)))?;
        gis_initialize(&config).map_err(|e| IdentityError::Sdk(js_message(&e)))?;

        // Initialized once per process; the SDK owns the callback from here on.
        on_credential.forget();
        Ok(())
    }

    fn render_button(
        &self,
        element_id: &str,
        options: &ButtonOptions,
    ) -> Result<(), IdentityError> {
        if gis_namespace().is_none() {
            return Err(IdentityError::Unavailable);
        }
        let parent: HtmlElement = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| IdentityError::Sdk(format!("missing #{element_id}")))?;
        let json = serde_json::to_string(options).map_err(|e| IdentityError::Sdk(e.to_string()))?;
        let options = js_sys::JSON::parse(&json).map_err(|e| IdentityError::Sdk(js_message(&e)))?;
        gis_render_button(&parent, &options).map_err(|e| IdentityError::Sdk(js_message(&e)))
    }
}
