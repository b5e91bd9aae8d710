//! Integration tests for Rule, RuleId, and Dimension

use ratescope_foundation::{
    DEFAULT_TIER, Dimension, NOT_APPLICABLE, Rule, RuleId, is_applicable,
};

// =============================================================================
// RuleId
// =============================================================================

#[test]
fn rule_id_display() {
    assert_eq!(RuleId::new(0).to_string(), "#0");
    assert_eq!(RuleId::new(17).to_string(), "#17");
}

#[test]
fn rule_id_ordering_follows_index() {
    assert!(RuleId::new(1) < RuleId::new(2));
    assert_eq!(RuleId::new(9).index(), 9);
}

// =============================================================================
// Rule
// =============================================================================

#[test]
fn rule_builders() {
    let rule = Rule::new("Authentication", "Free", "Token", "/oauth/token", "POST")
        .with_limits("30", "100", "per minute")
        .with_notes("Shared across clients");

    assert_eq!(rule.api, "Authentication");
    assert_eq!(rule.subscription_type, "Free");
    assert_eq!(rule.burst_limit, "30");
    assert_eq!(rule.sustained_limit, "100");
    assert_eq!(rule.sustained_limit_units, "per minute");
    assert_eq!(rule.notes, "Shared across clients");
    assert_eq!(rule.sustained_limit_value(), Some(100));
}

#[test]
fn method_tokens() {
    let rule = Rule::new("Management", "Pro", "Users", "/api/v2/users", "GET, POST");
    assert_eq!(rule.methods().collect::<Vec<_>>(), ["GET", "POST"]);
    assert!(rule.has_method("POST"));
    assert!(!rule.has_method("GET, POST"));
    assert_eq!(rule.primary_method(), "GET");
}

// =============================================================================
// Sentinels
// =============================================================================

#[test]
fn sentinel_values_are_not_applicable() {
    assert!(!is_applicable(NOT_APPLICABLE));
    assert!(!is_applicable(""));
    assert!(is_applicable(DEFAULT_TIER));
    assert!(is_applicable("n/a"));
}

// =============================================================================
// Dimension
// =============================================================================

#[test]
fn dimensions_are_broadest_first() {
    assert_eq!(Dimension::ALL[0], Dimension::Tier);
    assert_eq!(Dimension::ALL[4], Dimension::Query);
}

#[test]
fn prerequisites() {
    assert!(Dimension::Tier.prerequisites().is_empty());
    assert_eq!(Dimension::Api.prerequisites(), &[Dimension::Tier]);
    assert_eq!(Dimension::Query.prerequisites(), &[Dimension::Tier]);
    assert_eq!(
        Dimension::Method.prerequisites(),
        &[Dimension::Tier, Dimension::Api, Dimension::EndpointType]
    );
}

#[test]
fn labels() {
    assert_eq!(Dimension::EndpointType.to_string(), "endpoint type");
    assert_eq!(Dimension::Query.label(), "search");
}
