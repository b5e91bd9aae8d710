//! Integration tests for RuleStore
//!
//! Tests id assignment, lookup, and narrowing snapshots.

use ratescope_foundation::{Rule, RuleId};
use ratescope_storage::RuleStore;

fn store() -> RuleStore {
    RuleStore::from_rules(vec![
        Rule::new("Management", "Pro", "Users", "/api/v2/users", "GET, POST"),
        Rule::new("Management", "Pro", "Logs", "/api/v2/logs", "GET"),
        Rule::new("Authentication", "Pro", "Token", "/oauth/token", "POST"),
        Rule::new("Management", "Free", "Users", "/api/v2/users", "GET"),
    ])
    .unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn ids_follow_input_order() {
    let store = store();
    assert_eq!(store.len(), 4);
    assert_eq!(
        store.ids(),
        vec![RuleId::new(0), RuleId::new(1), RuleId::new(2), RuleId::new(3)]
    );
    assert_eq!(store.get(RuleId::new(2)).unwrap().path, "/oauth/token");
}

#[test]
fn empty_store() {
    let store = RuleStore::new();
    assert!(store.is_empty());
    assert!(store.get(RuleId::new(0)).is_none());
}

#[test]
fn stored_rule_derefs_to_rule() {
    let store = store();
    let stored = store.get(RuleId::new(1)).unwrap();
    assert_eq!(stored.id(), RuleId::new(1));
    assert_eq!(stored.endpoint_type, "Logs");
    assert_eq!(stored.rule().primary_method(), "GET");
}

// =============================================================================
// Narrowing
// =============================================================================

#[test]
fn narrowing_keeps_ids_and_order() {
    let pro = store().for_tier(Some("Pro"));
    assert_eq!(pro.ids(), vec![RuleId::new(0), RuleId::new(1), RuleId::new(2)]);

    let management = pro.for_api(Some("Management"));
    assert_eq!(management.ids(), vec![RuleId::new(0), RuleId::new(1)]);

    let users = management.for_endpoint_type(Some("Users"));
    assert_eq!(users.ids(), vec![RuleId::new(0)]);
}

#[test]
fn none_keeps_everything() {
    let store = store();
    assert_eq!(store.for_tier(None), store);
    assert_eq!(store.for_api(None).len(), 4);
    assert_eq!(store.for_method(None).len(), 4);
}

#[test]
fn method_matches_tokens() {
    let post = store().for_method(Some("POST"));
    assert_eq!(post.ids(), vec![RuleId::new(0), RuleId::new(2)]);
}

#[test]
fn unknown_tier_narrows_to_nothing() {
    assert!(store().for_tier(Some("Platinum")).is_empty());
}

#[test]
fn contains_checks_membership_of_snapshot() {
    let free = store().for_tier(Some("Free"));
    assert!(free.contains(RuleId::new(3)));
    assert!(!free.contains(RuleId::new(0)));
}

#[test]
fn find_by_path_returns_first_match() {
    let store = store();
    assert_eq!(
        store.find_by_path("/api/v2/users").map(|s| s.id()),
        Some(RuleId::new(0))
    );
    assert!(store.find_by_path("/api/v2").is_none());
}

#[test]
fn snapshot_is_iterable() {
    let store = store();
    let paths: Vec<&str> = (&store).into_iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths.len(), 4);
    assert_eq!(paths[3], "/api/v2/users");
}
