//! Tests for the process-wide client handle
//!
//! Kept to a single test so the static handle starts empty and the steps run
//! in a fixed order.

use ajlist_events::{AppContext, Client, ClientConfig, ClientError, ConfigError, shared};
use secrecy::ExposeSecret;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_shared_client_lifecycle() {
    assert!(shared::get().is_none());

    // A failing load leaves the handle unset
    let err = shared::get_or_init_with(|| Err(ConfigError::MissingVar("GEMINI_API_KEY")))
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Config(ConfigError::MissingVar("GEMINI_API_KEY"))
    ));
    assert!(shared::get().is_none());

    let loads = AtomicUsize::new(0);
    let load = |key: &'static str| {
        let loads = &loads;
        move || {
            loads.fetch_add(1, Ordering::SeqCst);
            ClientConfig::builder(key).build()
        }
    };

    let first = shared::get_or_init_with(load("first-key")).unwrap();
    assert_eq!(first.id(), "ajlist");

    // Later callers get the same instance and their config is never loaded
    let second = shared::get_or_init_with(load("second-key")).unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(
        second.config().ai.gemini.api_key.expose_secret(),
        "first-key"
    );

    let context = AppContext::bootstrap_with(load("third-key")).unwrap();
    assert!(std::ptr::eq(context.client(), first));
    assert!(std::ptr::eq(shared::get().unwrap(), first));

    let other = Client::new(ClientConfig::builder("other-key").build().unwrap()).unwrap();
    assert!(matches!(
        shared::install(other),
        Err(ClientError::AlreadyInitialized)
    ));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
