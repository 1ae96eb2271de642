mod common;

use common::{ok_auth, Harness, RecordingSession};
use pongweb::api::ApiError;
use pongweb::identity::IdentityError;
use pongweb::views::login;

fn visibility(h: &Harness) -> Option<String> {
    h.host.style(login::GOOGLE_BUTTON_ID, "visibility")
}

/// Login page with the SDK loaded and the button rendered.
fn ready() -> Harness {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    h.sdk.finish(Ok(()));
    h.host.settle();
    h
}

#[test]
fn button_appears_once_the_script_loads() {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    assert_eq!(h.sdk.loads.get(), 1);
    assert_eq!(visibility(&h).as_deref(), Some("hidden"));

    h.sdk.finish(Ok(()));
    h.host.settle();
    assert_eq!(h.sdk.inits.get(), 1);
    assert_eq!(h.sdk.renders.get(), 1);
    assert_eq!(visibility(&h).as_deref(), Some("visible"));
}

#[test]
fn script_loads_once_across_remounts() {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    h.go("/register");
    h.go("/login");
    assert_eq!(h.sdk.loads.get(), 1);

    h.sdk.finish(Ok(()));
    h.host.settle();
    assert_eq!(h.sdk.loads.get(), 1);
    assert_eq!(h.sdk.inits.get(), 1);
    // Only the login page still mounted gets a button.
    assert_eq!(h.sdk.renders.get(), 1);

    // Already available: a later visit renders without loading again.
    h.go("/");
    h.go("/login");
    assert_eq!(h.sdk.loads.get(), 1);
    assert_eq!(h.sdk.inits.get(), 1);
    assert_eq!(h.sdk.renders.get(), 2);
}

#[test]
fn login_dispatched_twice_before_init_renders_one_button() {
    let h = Harness::new("#/login");
    h.app.start();
    h.app.router().navigate();
    h.host.settle();
    h.sdk.finish(Ok(()));
    h.host.settle();

    assert_eq!(h.host.mount_count(), 2);
    assert_eq!(h.sdk.loads.get(), 1);
    assert_eq!(h.sdk.inits.get(), 1);
    assert_eq!(h.sdk.renders.get(), 1);
    assert_eq!(visibility(&h).as_deref(), Some("visible"));
}

#[test]
fn login_remounted_while_script_loads_renders_one_button() {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    // The first mount's button task is waiting on the script.
    h.app.router().navigate();
    h.host.settle();
    h.sdk.finish(Ok(()));
    h.host.settle();

    assert_eq!(h.sdk.loads.get(), 1);
    assert_eq!(h.sdk.renders.get(), 1);
    assert_eq!(visibility(&h).as_deref(), Some("visible"));
}

#[test]
fn leaving_before_the_script_loads_skips_initialization() {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    h.go("/register");

    h.sdk.finish(Ok(()));
    h.host.settle();
    assert_eq!(h.sdk.inits.get(), 0);
    assert_eq!(h.sdk.renders.get(), 0);
}

#[test]
fn failed_script_load_leaves_password_form_working() {
    let h = Harness::new("#/login");
    h.app.start();
    h.host.settle();
    h.sdk
        .finish(Err(IdentityError::ScriptLoad("blocked by extension".into())));
    h.host.settle();

    assert_eq!(h.sdk.inits.get(), 0);
    assert_eq!(visibility(&h).as_deref(), Some("hidden"));
    assert!(h.host.alerts().is_empty());

    *h.api.login.borrow_mut() = Some(ok_auth("t1"));
    h.host.submit(
        login::FORM_ID,
        &[("email", "ada@example.com"), ("password", "pw")],
    );
    h.host.settle();
    assert_eq!(h.path(), "/dashboard");

    // The next visit tries the script again.
    h.go("/login");
    assert_eq!(h.sdk.loads.get(), 2);
}

#[test]
fn missing_client_id_only_disables_the_button() {
    let h = Harness::with("#/login", None, RecordingSession::default());
    h.app.start();
    h.host.settle();

    assert_eq!(h.sdk.loads.get(), 0);
    assert_eq!(visibility(&h).as_deref(), Some("hidden"));

    *h.api.login.borrow_mut() = Some(ok_auth("t1"));
    assert!(h.host.submit(
        login::FORM_ID,
        &[("email", "ada@example.com"), ("password", "pw")],
    ));
    h.host.settle();
    assert_eq!(h.session.set_auth_calls.borrow().len(), 1);
    assert_eq!(h.path(), "/dashboard");
}

#[test]
fn callback_without_credential_is_ignored() {
    let h = ready();
    h.sdk.fire(None);
    h.sdk.fire(Some(""));
    h.host.settle();

    assert!(h.api.calls().is_empty());
    assert_eq!(h.path(), "/login");
    assert!(h.session.set_auth_calls.borrow().is_empty());
}

#[test]
fn credential_is_exchanged_for_a_session() {
    let h = ready();
    *h.api.oauth.borrow_mut() = Some(ok_auth("g1"));
    h.sdk.fire(Some("google-id-token"));
    h.host.settle();

    assert_eq!(h.api.calls(), vec!["oauth google-id-token"]);
    assert_eq!(h.session.set_auth_calls.borrow()[0].0, "g1");
    assert_eq!(h.path(), "/dashboard");
}

#[test]
fn oauth_failure_uses_an_alert_not_the_inline_error() {
    let h = ready();
    *h.api.oauth.borrow_mut() = Some(Err(ApiError::new("Google token rejected")));
    h.sdk.fire(Some("google-id-token"));
    h.host.settle();

    assert_eq!(h.host.alerts(), vec!["Google token rejected".to_string()]);
    assert_ne!(
        h.host.style(login::ERROR_ID, "display").as_deref(),
        Some("block")
    );
    assert_eq!(h.path(), "/login");
}

#[test]
fn empty_oauth_error_falls_back_to_generic_alert() {
    let h = ready();
    *h.api.oauth.borrow_mut() = Some(Err(ApiError::new("")));
    h.sdk.fire(Some("google-id-token"));
    h.host.settle();
    assert_eq!(h.host.alerts(), vec!["Google login failed".to_string()]);
}
