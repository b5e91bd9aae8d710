//! Integration tests for the reset cascade
//!
//! Changing a broader dimension clears every narrower one, the search text,
//! and the selection.

use ratescope_engine::{Dimensions, Outcome, propagate};
use ratescope_foundation::Dimension;

use crate::fixtures::{FREE_TOKEN, FREE_USERS, PRO_USERS, engine, pro};

fn narrowed() -> ratescope_engine::LookupEngine {
    let mut engine = pro();
    engine.select(Dimension::Api, Some("Management")).unwrap();
    engine.select(Dimension::EndpointType, Some("Users")).unwrap();
    engine.select(Dimension::Method, Some("POST")).unwrap();
    engine
}

// =============================================================================
// Propagation Table
// =============================================================================

#[test]
fn tier_clears_everything_narrower() {
    let effect = propagate(Dimension::Tier);
    assert_eq!(
        effect.resets,
        Dimensions::API | Dimensions::ENDPOINT_TYPE | Dimensions::METHOD | Dimensions::QUERY
    );
    assert!(effect.clears_selection);
}

#[test]
fn endpoint_type_clears_method_and_query() {
    let effect = propagate(Dimension::EndpointType);
    assert_eq!(effect.resets, Dimensions::METHOD | Dimensions::QUERY);
}

#[test]
fn method_clears_nothing() {
    let effect = propagate(Dimension::Method);
    assert!(effect.resets.is_empty());
    assert!(!effect.clears_selection);
}

#[test]
fn query_only_clears_the_selection() {
    let effect = propagate(Dimension::Query);
    assert!(effect.resets.is_empty());
    assert!(effect.clears_selection);
}

// =============================================================================
// Engine Cascade
// =============================================================================

#[test]
fn changing_tier_resets_narrower_filters() {
    let mut engine = narrowed();
    assert_eq!(engine.selected_id(), Some(PRO_USERS));

    let update = engine.select(Dimension::Tier, Some("Free")).unwrap();
    let filters = engine.filters();
    assert_eq!(filters.tier(), Some("Free"));
    assert_eq!(filters.api(), None);
    assert_eq!(filters.endpoint_type(), None);
    assert_eq!(filters.method(), None);
    assert!(update.cleared.contains(Dimensions::METHOD));
    assert_eq!(engine.selected_id(), None);
    assert_eq!(engine.resolution().ids(), vec![FREE_USERS, FREE_TOKEN]);
}

#[test]
fn reselecting_the_same_tier_still_resets() {
    let mut engine = narrowed();
    engine.select(Dimension::Tier, Some("Pro")).unwrap();
    assert_eq!(engine.filters().api(), None);
    assert_eq!(engine.selected_id(), None);
    assert_eq!(engine.resolution().len(), 4);
}

#[test]
fn changing_api_keeps_the_tier() {
    let mut engine = narrowed();
    engine.select(Dimension::Api, Some("Authentication")).unwrap();
    assert_eq!(engine.filters().tier(), Some("Pro"));
    assert_eq!(engine.filters().endpoint_type(), None);
}

#[test]
fn dropdown_change_clears_search_text() {
    let mut engine = pro();
    engine.set_query("logs").unwrap();
    engine.select(Dimension::Api, Some("Management")).unwrap();
    assert_eq!(engine.filters().query(), "");
}

#[test]
fn clearing_a_dimension_cascades_too() {
    let mut engine = narrowed();
    engine.select(Dimension::Api, None).unwrap();
    assert_eq!(engine.filters().endpoint_type(), None);
    assert_eq!(engine.resolution().len(), 4);
}

// =============================================================================
// Effective Tier
// =============================================================================

#[test]
fn applied_tier_is_not_validated() {
    let mut engine = engine();
    engine.apply_tier(Some("Platinum"));
    assert_eq!(engine.filters().tier(), Some("Platinum"));
    assert_eq!(engine.outcome(), Outcome::NoDataFound);
}

#[test]
fn clearing_the_tier_shows_everything() {
    let mut engine = pro();
    engine.apply_tier(None);
    assert_eq!(engine.resolution().len(), engine.store().len());
    assert!(!engine.readiness().api);
}

#[test]
fn reset_clears_everything() {
    let mut engine = narrowed();
    let update = engine.reset();
    assert_eq!(update.cleared, Dimensions::all());
    assert_eq!(engine.filters().tier(), None);
    assert_eq!(engine.selected_id(), None);
}

// =============================================================================
// Memoization
// =============================================================================

#[test]
fn views_recompute_only_when_their_inputs_change() {
    let mut engine = pro();
    let before = engine.stats();

    engine.select(Dimension::Api, Some("Management")).unwrap();
    let after = engine.stats();
    assert_eq!(after.tier_slice, before.tier_slice);
    assert_eq!(after.suggestions, before.suggestions);
    assert_eq!(after.options, before.options + 1);
    assert_eq!(after.resolution, before.resolution + 1);
}

#[test]
fn search_does_not_recompute_options() {
    let mut engine = pro();
    let before = engine.stats();
    engine.set_query("users").unwrap();
    assert_eq!(engine.stats().options, before.options);
}
