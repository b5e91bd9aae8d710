//! Shared rule tables for engine tests.

use ratescope_engine::LookupEngine;
use ratescope_foundation::{Dimension, NOT_APPLICABLE, Rule, RuleId};
use ratescope_storage::RuleStore;

/// `#0` Pro Management Users `/api/v2/users` GET, POST
pub const PRO_USERS: RuleId = RuleId::new(0);
/// `#1` Pro Management Logs `/api/v2/logs` GET
pub const PRO_LOGS: RuleId = RuleId::new(1);
/// `#2` Pro Management Roles `/api/v2/roles` GET, POST
pub const PRO_ROLES: RuleId = RuleId::new(2);
/// `#3` Pro Authentication Token `/oauth/token` POST
pub const PRO_TOKEN: RuleId = RuleId::new(3);
/// `#4` Free Management Users `/api/v2/users` GET
pub const FREE_USERS: RuleId = RuleId::new(4);
/// `#5` Free Authentication Token `/oauth/token` POST
pub const FREE_TOKEN: RuleId = RuleId::new(5);

pub fn store() -> RuleStore {
    RuleStore::from_rules(vec![
        Rule::new("Management", "Pro", "Users", "/api/v2/users", "GET, POST")
            .with_limits("50", "15", "per second"),
        Rule::new("Management", "Pro", "Logs", "/api/v2/logs", "GET")
            .with_limits("50", "300", "per minute"),
        Rule::new("Management", "Pro", "Roles", "/api/v2/roles", "GET, POST")
            .with_limits("50", "600", "per minute"),
        Rule::new("Authentication", "Pro", "Token", "/oauth/token", "POST")
            .with_limits("100", "30", "per second"),
        Rule::new("Management", "Free", "Users", "/api/v2/users", "GET")
            .with_limits("10", "2", "per second"),
        Rule::new("Authentication", "Free", "Token", "/oauth/token", "POST")
            .with_limits("20", "10", "per minute"),
        Rule::new(
            NOT_APPLICABLE,
            NOT_APPLICABLE,
            NOT_APPLICABLE,
            NOT_APPLICABLE,
            NOT_APPLICABLE,
        ),
    ])
    .unwrap()
}

pub fn engine() -> LookupEngine {
    LookupEngine::new(store())
}

/// An engine with the Pro tier selected.
pub fn pro() -> LookupEngine {
    let mut engine = engine();
    engine.select(Dimension::Tier, Some("Pro")).unwrap();
    engine
}
