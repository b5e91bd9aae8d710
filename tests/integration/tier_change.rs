//! Tier changes during an active lookup

use ratescope::foundation::{Dimension, RuleId};
use ratescope::runtime::{FetchStatus, Task, UsageStatus};

use crate::session;

#[test]
fn changing_tier_while_selected_stops_sampling() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.set_override(true);
    s.select(Dimension::Tier, Some("Pro")).unwrap();
    s.search("logs").unwrap();
    assert_eq!(s.engine().selected_id(), Some(RuleId::new(13)));
    assert_eq!(s.usage(), &UsageStatus::Loading);

    s.advance(300);
    s.select(Dimension::Tier, Some("Enterprise")).unwrap();
    assert_eq!(s.engine().selected_id(), None);
    assert_eq!(s.engine().filters().query(), "");

    let fired = s.advance(20_000);
    assert!(
        fired
            .iter()
            .all(|f| !matches!(f.handle.task(), Task::UsageDelay | Task::UsagePoll))
    );
    assert_eq!(s.usage(), &UsageStatus::Idle);
}

#[test]
fn login_mid_lookup_starts_over_with_the_subscription_tier() {
    let mut s = session("Enterprise");
    s.select(Dimension::Tier, Some("Free")).unwrap();
    s.search("signup").unwrap();
    assert_eq!(s.engine().selected_id(), Some(RuleId::new(18)));

    s.login().unwrap();
    assert_eq!(s.fetch_status(), FetchStatus::Success);
    assert_eq!(s.engine().filters().tier(), Some("Enterprise"));
    assert_eq!(s.engine().filters().query(), "");
    assert_eq!(s.engine().selected_id(), None);
    assert_eq!(s.engine().resolution().len(), 5);
}

#[test]
fn logout_mid_sampling_returns_to_an_empty_lookup() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.search("roles").unwrap();
    s.advance(500);
    assert!(s.usage().sample().is_some());

    s.logout();
    assert_eq!(s.effective_tier(), None);
    assert_eq!(s.usage(), &UsageStatus::Idle);
    assert!(s.advance(60_000).is_empty());
}

#[test]
fn subscription_tier_survives_an_override_round_trip() {
    let mut s = session("Pro");
    s.login().unwrap();
    s.set_override(true);
    s.select(Dimension::Tier, Some("Free")).unwrap();
    assert_eq!(s.engine().tier_slice().len(), 9);

    s.set_override(false);
    assert_eq!(s.effective_tier(), Some("Pro"));
    assert_eq!(s.engine().tier_slice().len(), 8);
}
