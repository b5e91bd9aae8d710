//! Integration tests for path search and suggestions

use ratescope_engine::{Outcome, ResolveMode, SUGGESTION_LIMIT, SearchMatcher};
use ratescope_foundation::{Dimension, Rule};
use ratescope_storage::RuleStore;

use crate::fixtures::{PRO_LOGS, PRO_ROLES, PRO_TOKEN, PRO_USERS, pro, store};

// =============================================================================
// Matching
// =============================================================================

#[test]
fn matches_path_endpoint_type_or_api() {
    let rule = Rule::new("Authentication", "Pro", "Token", "/oauth/token", "POST");
    assert!(SearchMatcher::new("OAUTH").matches(&rule));
    assert!(SearchMatcher::new("token").matches(&rule));
    assert!(SearchMatcher::new("authent").matches(&rule));
    assert!(!SearchMatcher::new("users").matches(&rule));
}

#[test]
fn query_is_trimmed() {
    assert_eq!(SearchMatcher::new("  Logs ").needle(), "logs");
    assert!(SearchMatcher::new("   ").is_empty());
}

// =============================================================================
// Suggestions
// =============================================================================

#[test]
fn suggestions_are_distinct_paths_of_the_tier() {
    let engine = {
        let mut engine = pro();
        engine.set_query("/").unwrap();
        engine
    };
    assert_eq!(
        engine.suggestions(),
        ["/api/v2/users", "/api/v2/logs", "/api/v2/roles", "/oauth/token"]
    );
}

#[test]
fn suggestions_are_capped() {
    let rules = (0..8).map(|i| {
        Rule::new("Management", "Pro", "Users", format!("/api/v2/users/{i}"), "GET")
    });
    let store = RuleStore::from_rules(rules).unwrap();
    let suggestions = SearchMatcher::new("users").suggestions(&store);
    assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
    assert_eq!(suggestions[0], "/api/v2/users/0");
}

#[test]
fn suggestions_skip_sentinel_paths() {
    let suggestions = SearchMatcher::new("n/a").suggestions(&store());
    assert!(suggestions.is_empty());
}

#[test]
fn empty_query_suggests_nothing() {
    assert!(SearchMatcher::new("").suggestions(&store()).is_empty());
}

// =============================================================================
// Search Results
// =============================================================================

#[test]
fn search_replaces_dropdown_filtering() {
    let mut engine = pro();
    engine.select(Dimension::Api, Some("Authentication")).unwrap();
    engine.set_query("api").unwrap();

    let resolution = engine.resolution();
    assert_eq!(resolution.mode, ResolveMode::Search);
    assert_eq!(resolution.ids(), vec![PRO_USERS, PRO_LOGS, PRO_ROLES]);
}

#[test]
fn search_stays_inside_the_tier() {
    let mut engine = pro();
    engine.set_query("token").unwrap();
    assert_eq!(engine.resolution().ids(), vec![PRO_TOKEN]);
}

#[test]
fn search_without_matches_is_no_data() {
    let mut engine = pro();
    engine.set_query("billing").unwrap();
    assert_eq!(engine.outcome(), Outcome::NoDataFound);
}

#[test]
fn whitespace_query_falls_back_to_filters() {
    let mut engine = pro();
    engine.set_query("   ").unwrap();
    assert_eq!(engine.resolution().mode, ResolveMode::Filter);
    assert_eq!(engine.resolution().len(), 4);
}

#[test]
fn results_group_by_api() {
    let mut engine = pro();
    engine.set_query("t").unwrap();
    let grouped = engine.grouped();
    assert_eq!(grouped.apis(), ["Authentication", "Management"]);
    assert_eq!(grouped.group("Management").unwrap().len(), 3);
    assert_eq!(grouped.len(), 2);
}
