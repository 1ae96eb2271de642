//! Google Identity Services, behind a process-wide one-shot capability.
//!
//! [`GoogleIdentity`] is the single owner of the SDK lifecycle:
//! - the script is loaded at most once; concurrent callers await the same
//!   shared load and observe the same outcome
//! - a load that failed may be retried by a later caller
//! - `initialize` runs at most once per process, whatever view asks for it
//!
//! The browser binding lives in [`crate::webshim`]; [`HeadlessSdk`] stands in
//! where there is no browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use serde::{Deserialize, Serialize};

use crate::debug::{self, cat};

pub const GIS_SCRIPT_URL: &str = "https://accounts.google.com/gsi/client";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity script failed to load: {0}")]
    ScriptLoad(String),
    #[error("Google Identity Services not available")]
    Unavailable,
    #[error("identity SDK call failed: {0}")]
    Sdk(String),
}

/// What the SDK hands the sign-in callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialResponse {
    #[serde(default)]
    pub credential: Option<String>,
}

pub type CredentialCallback = Rc<dyn Fn(CredentialResponse)>;

/// Options for the rendered sign-in button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonOptions {
    pub theme: String,
    pub size: String,
    pub text: String,
    pub shape: String,
    pub logo_alignment: String,
    pub width: u32,
    pub locale: String,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            theme: "filled_white".into(),
            size: "large".into(),
            text: "signin_with".into(),
            shape: "rect".into(),
            logo_alignment: "left".into(),
            width: 260,
            locale: "en".into(),
        }
    }
}

pub trait IdentitySdk {
    /// The SDK global is present and usable.
    fn is_available(&self) -> bool;
    /// Inject (or reuse) the script tag and resolve once it has loaded.
    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), IdentityError>>;
    fn initialize(&self, client_id: &str, callback: CredentialCallback)
        -> Result<(), IdentityError>;
    fn render_button(&self, element_id: &str, options: &ButtonOptions)
        -> Result<(), IdentityError>;
}

pub type ScriptLoad = Shared<LocalBoxFuture<'static, Result<(), IdentityError>>>;

pub struct GoogleIdentity {
    sdk: Rc<dyn IdentitySdk>,
    loading: RefCell<Option<ScriptLoad>>,
    initialized: Cell<bool>,
}

impl GoogleIdentity {
    pub fn new(sdk: Rc<dyn IdentitySdk>) -> Self {
        Self {
            sdk,
            loading: RefCell::new(None),
            initialized: Cell::new(false),
        }
    }

    /// Shared handle on the script load; starts it if nobody has yet.
    pub fn ensure_loaded(&self) -> ScriptLoad {
        if self.sdk.is_available() {
            return future::ready(Ok(())).boxed_local().shared();
        }
        let mut slot = self.loading.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            if !matches!(pending.peek(), Some(Err(_))) {
                return pending.clone();
            }
            debug::log(cat::OAUTH, "retrying identity script after failed load");
        }
        debug::log(cat::OAUTH, "loading identity script");
        let load = self.sdk.load_script().shared();
        *slot = Some(load.clone());
        load
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Initialize the SDK unless already done. Returns whether this call did it.
    pub fn ensure_initialized(
        &self,
        client_id: &str,
        callback: CredentialCallback,
    ) -> Result<bool, IdentityError> {
        if self.initialized.get() {
            return Ok(false);
        }
        self.sdk.initialize(client_id, callback)?;
        self.initialized.set(true);
        debug::log(cat::OAUTH, "identity SDK initialized");
        Ok(true)
    }

    pub fn render_button(
        &self,
        element_id: &str,
        options: &ButtonOptions,
    ) -> Result<(), IdentityError> {
        self.sdk.render_button(element_id, options)
    }
}

/// No browser, no identity SDK.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessSdk;

impl IdentitySdk for HeadlessSdk {
    fn is_available(&self) -> bool {
        false
    }

    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), IdentityError>> {
        future::ready(Err(IdentityError::Unavailable)).boxed_local()
    }

    fn initialize(&self, _: &str, _: CredentialCallback) -> Result<(), IdentityError> {
        Err(IdentityError::Unavailable)
    }

    fn render_button(&self, _: &str, _: &ButtonOptions) -> Result<(), IdentityError> {
        Err(IdentityError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    /// Loads complete when the test resolves the pending sender.
    #[derive(Default)]
    struct ManualSdk {
        loads: Cell<usize>,
        inits: Cell<usize>,
        available: Cell<bool>,
        pending: RefCell<Vec<oneshot::Sender<Result<(), IdentityError>>>>,
    }

    impl ManualSdk {
        fn finish(&self, outcome: Result<(), IdentityError>) {
            for tx in self.pending.borrow_mut().drain(..) {
                let _ = tx.send(outcome.clone());
            }
            if outcome.is_ok() {
                self.available.set(true);
            }
        }
    }

    impl IdentitySdk for ManualSdk {
        fn is_available(&self) -> bool {
            self.available.get()
        }

        fn load_script(&self) -> LocalBoxFuture<'static, Result<(), IdentityError>> {
            self.loads.set(self.loads.get() + 1);
            let (tx, rx) = oneshot::channel();
            self.pending.borrow_mut().push(tx);
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(IdentityError::ScriptLoad("dropped".into())))
            }
            .boxed_local()
        }

        fn initialize(&self, _: &str, _: CredentialCallback) -> Result<(), IdentityError> {
            self.inits.set(self.inits.get() + 1);
            Ok(())
        }

        fn render_button(&self, _: &str, _: &ButtonOptions) -> Result<(), IdentityError> {
            Ok(())
        }
    }

    #[test]
    fn concurrent_callers_share_one_load() {
        let sdk = Rc::new(ManualSdk::default());
        let gis = GoogleIdentity::new(sdk.clone());

        let a = gis.ensure_loaded();
        let b = gis.ensure_loaded();
        assert_eq!(sdk.loads.get(), 1);

        sdk.finish(Err(IdentityError::ScriptLoad("blocked".into())));
        let (ra, rb) = block_on(future::join(a, b));
        assert_eq!(ra, rb);
        assert!(matches!(ra, Err(IdentityError::ScriptLoad(_))));
    }

    #[test]
    fn failed_load_can_be_retried() {
        let sdk = Rc::new(ManualSdk::default());
        let gis = GoogleIdentity::new(sdk.clone());

        let first = gis.ensure_loaded();
        sdk.finish(Err(IdentityError::ScriptLoad("offline".into())));
        assert!(block_on(first).is_err());

        let second = gis.ensure_loaded();
        assert_eq!(sdk.loads.get(), 2);
        sdk.finish(Ok(()));
        assert!(block_on(second).is_ok());

        // Available now: no further loads.
        assert!(block_on(gis.ensure_loaded()).is_ok());
        assert_eq!(sdk.loads.get(), 2);
    }

    #[test]
    fn pending_load_is_not_restarted() {
        let sdk = Rc::new(ManualSdk::default());
        let gis = GoogleIdentity::new(sdk.clone());
        let _first = gis.ensure_loaded();
        let _second = gis.ensure_loaded();
        let _third = gis.ensure_loaded();
        assert_eq!(sdk.loads.get(), 1);
    }

    #[test]
    fn initialize_runs_once() {
        let sdk = Rc::new(ManualSdk::default());
        let gis = GoogleIdentity::new(sdk.clone());
        let cb: CredentialCallback = Rc::new(|_| {});
        assert_eq!(gis.ensure_initialized("client", cb.clone()), Ok(true));
        assert_eq!(gis.ensure_initialized("client", cb), Ok(false));
        assert_eq!(sdk.inits.get(), 1);
        assert!(gis.is_initialized());
    }

    #[test]
    fn headless_sdk_is_unavailable() {
        let gis = GoogleIdentity::new(Rc::new(HeadlessSdk));
        assert_eq!(
            block_on(gis.ensure_loaded()),
            Err(IdentityError::Unavailable)
        );
        let cb: CredentialCallback = Rc::new(|_| {});
        assert!(gis.ensure_initialized("client", cb).is_err());
        assert!(!gis.is_initialized());
    }

    #[test]
    fn default_button_options_serialize_for_the_sdk() {
        let json = serde_json::to_value(ButtonOptions::default()).unwrap();
        assert_eq!(json["theme"], "filled_white");
        assert_eq!(json["logo_alignment"], "left");
        assert_eq!(json["width"], 260);
    }
}
