//! Lookup flows over the bundled table

use ratescope::engine::{Outcome, ResolveMode, SelectionCause};
use ratescope::foundation::{Dimension, RuleId};
use ratescope::runtime::{Task, render};

use crate::session;

// =============================================================================
// Dropdown Narrowing
// =============================================================================

#[test]
fn narrowing_by_dropdowns_until_one_rule_remains() {
    let mut s = session("Pro");
    s.select(Dimension::Tier, Some("Free")).unwrap();
    assert_eq!(
        s.engine().options().apis,
        ["Account", "Authentication", "Management"]
    );

    s.select(Dimension::Api, Some("Management")).unwrap();
    s.select(Dimension::EndpointType, Some("Users")).unwrap();
    assert_eq!(s.engine().resolution().len(), 2);
    assert_eq!(s.engine().options().methods, ["DELETE", "GET", "PATCH", "POST"]);
    assert_eq!(s.engine().selected_id(), None);

    let update = s.select(Dimension::Method, Some("PATCH")).unwrap();
    let change = update.selection.unwrap();
    assert_eq!(change.to, Some(RuleId::new(7)));
    assert_eq!(change.cause, SelectionCause::UniqueResult);

    s.select(Dimension::Method, Some("GET")).unwrap();
    assert_eq!(s.engine().selected_id(), None);
}

#[test]
fn sentinel_tier_is_never_offered() {
    let s = session("Pro");
    let tenants = &s.engine().options().tenants;
    assert_eq!(tenants, &["Enterprise", "Free", "Pro"]);
}

#[test]
fn high_risk_rules_are_flagged() {
    let mut s = session("Pro");
    s.select(Dimension::Tier, Some("Free")).unwrap();
    s.search("/api/v2/users").unwrap();

    let text = render::results(&s);
    assert!(text.contains("3 results"));
    assert!(text.contains("Management (3)"));
    assert!(text.contains("HIGH RISK: per-second limit, very low limit"));
}

// =============================================================================
// Search and Suggestions
// =============================================================================

#[test]
fn search_suggest_pick_and_sample() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.focus();
    s.search("users").unwrap();

    assert_eq!(s.engine().resolution().mode, ResolveMode::Search);
    assert_eq!(s.engine().resolution().len(), 3);
    assert_eq!(
        s.visible_suggestions(),
        ["/api/v2/users", "/api/v2/users/{id}", "/api/v2/jobs/users-exports"]
    );
    assert_eq!(s.sampled_rule(), None);

    s.key_down();
    let update = s.enter().unwrap().unwrap();
    assert_eq!(update.selection.unwrap().cause, SelectionCause::SuggestionPicked);
    assert_eq!(s.engine().selected_id(), Some(RuleId::new(10)));
    assert_eq!(s.engine().filters().api(), Some("Management"));
    assert_eq!(s.engine().filters().endpoint_type(), Some("Users"));
    assert_eq!(s.engine().resolution().len(), 2);

    let fired = s.advance(10_000);
    assert_eq!(fired.len(), 2);
    let sample = s.usage().sample().unwrap();
    assert_eq!(sample.limit, 15);
    assert_eq!(sample.limit_unit, "per second");
    assert_eq!(sample.reset_time, "14:31:10");
}

#[test]
fn search_without_matches_keeps_nothing_selected() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.search("billing").unwrap();
    assert_eq!(s.engine().outcome(), Outcome::NoDataFound);
    assert!(render::results(&s).contains("no data found"));
    assert!(!s.scheduler().is_pending(Task::UsageDelay));
}

#[test]
fn clearing_the_search_returns_to_the_dropdowns() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.search("logs").unwrap();
    assert_eq!(s.engine().selected_id(), Some(RuleId::new(13)));

    s.clear_search().unwrap();
    assert_eq!(s.engine().resolution().mode, ResolveMode::Filter);
    assert_eq!(s.engine().resolution().len(), 8);
    assert_eq!(s.engine().selected_id(), None);
    assert_eq!(s.engine().filters().tier(), Some("Pro"));
}
