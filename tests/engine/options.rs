//! Integration tests for option derivation and readiness

use ratescope_engine::{OptionDeriver, Readiness};
use ratescope_foundation::{Dimension, ErrorKind};

use crate::fixtures::{engine, pro, store};

// =============================================================================
// Derivation
// =============================================================================

#[test]
fn tenants_come_from_the_whole_store() {
    let options = OptionDeriver::derive(&store(), Some("Pro"), None, None);
    assert_eq!(options.tenants, ["Free", "Pro"]);
}

#[test]
fn each_list_narrows_by_the_broader_selections() {
    let options = OptionDeriver::derive(&store(), Some("Pro"), Some("Management"), Some("Users"));
    assert_eq!(options.apis, ["Authentication", "Management"]);
    assert_eq!(options.endpoint_types, ["Logs", "Roles", "Users"]);
    assert_eq!(options.methods, ["GET", "POST"]);
}

#[test]
fn method_tokens_are_split_and_deduplicated() {
    let options = OptionDeriver::derive(&store(), Some("Pro"), Some("Management"), Some("Roles"));
    assert_eq!(options.methods, ["GET", "POST"]);
    let free = OptionDeriver::derive(&store(), Some("Free"), Some("Management"), Some("Users"));
    assert_eq!(free.methods, ["GET"]);
}

#[test]
fn no_tier_offers_every_api() {
    let options = OptionDeriver::derive(&store(), None, None, None);
    assert_eq!(options.apis, ["Authentication", "Management"]);
    assert!(!options.apis.iter().any(|a| a == "N/A"));
}

#[test]
fn unknown_tier_offers_nothing() {
    let options = OptionDeriver::derive(&store(), Some("Platinum"), None, None);
    assert!(options.apis.is_empty());
    assert_eq!(options.tenants.len(), 2);
}

#[test]
fn offers_and_for_dimension() {
    let engine = pro();
    let options = engine.options();
    assert!(options.offers(Dimension::Api, "Management"));
    assert!(!options.offers(Dimension::Api, "Account"));
    assert!(options.for_dimension(Dimension::Query).is_empty());
}

// =============================================================================
// Readiness
// =============================================================================

#[test]
fn nothing_is_ready_without_a_tier() {
    let readiness = engine().readiness();
    assert!(!readiness.api);
    assert!(!readiness.search);
    assert!(!readiness.method);
}

#[test]
fn readiness_follows_prerequisites() {
    let mut engine = pro();
    assert_eq!(
        engine.readiness(),
        Readiness {
            api: true,
            endpoint_type: false,
            method: false,
            search: true,
            dropdowns_overridden: false,
        }
    );

    engine.select(Dimension::Api, Some("Management")).unwrap();
    engine.select(Dimension::EndpointType, Some("Users")).unwrap();
    assert!(engine.readiness().method);
}

#[test]
fn search_overrides_the_dropdowns() {
    let mut engine = pro();
    engine.set_query("logs").unwrap();
    assert!(engine.readiness().dropdowns_overridden);
}

// =============================================================================
// Rejected Selections
// =============================================================================

#[test]
fn endpoint_type_before_api_is_rejected() {
    let mut engine = pro();
    let err = engine.select(Dimension::EndpointType, Some("Users")).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::NotReady {
            dimension: Dimension::EndpointType,
            missing: Dimension::Api,
        }
    ));
}

#[test]
fn search_before_tier_is_rejected() {
    let mut engine = engine();
    let err = engine.set_query("users").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotReady { .. }));
    assert_eq!(engine.filters().query(), "");
}

#[test]
fn value_outside_options_is_rejected() {
    let mut engine = pro();
    engine.select(Dimension::Api, Some("Management")).unwrap();
    let err = engine.select(Dimension::EndpointType, Some("Token")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownOption { .. }));
    assert_eq!(engine.filters().endpoint_type(), None);
}

#[test]
fn clearing_never_needs_prerequisites() {
    let mut engine = engine();
    assert!(engine.select(Dimension::Method, None).is_ok());
}
