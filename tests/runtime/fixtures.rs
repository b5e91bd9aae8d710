//! Shared sessions and collaborators for runtime tests.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use ratescope_foundation::{Error, ErrorKind, Result, Rule, RuleId};
use ratescope_runtime::{Clipboard, FixedTierService, RuntimeConfig, Session, StaticTokenAuth};
use ratescope_storage::RuleStore;

/// `#0` Pro Management Users `/api/v2/users`, 15 per second
pub const PRO_USERS: RuleId = RuleId::new(0);
/// `#1` Pro Management Logs `/api/v2/logs`, 300 per minute
pub const PRO_LOGS: RuleId = RuleId::new(1);
/// `#2` Pro Authentication Token `/oauth/token`, N/A
pub const PRO_TOKEN: RuleId = RuleId::new(2);
/// `#3` Free Management Users `/api/v2/users`, 2 per second
pub const FREE_USERS: RuleId = RuleId::new(3);

pub fn store() -> RuleStore {
    RuleStore::from_rules(vec![
        Rule::new("Management", "Pro", "Users", "/api/v2/users", "GET, POST")
            .with_limits("50", "15", "per second")
            .with_notes("Includes search"),
        Rule::new("Management", "Pro", "Logs", "/api/v2/logs", "GET")
            .with_limits("50", "300", "per minute"),
        Rule::new("Authentication", "Pro", "Token", "/oauth/token", "POST")
            .with_limits("100", "N/A", "per minute"),
        Rule::new("Management", "Free", "Users", "/api/v2/users", "GET")
            .with_limits("10", "2", "per second"),
    ])
    .unwrap()
}

/// 2024-01-01 09:00:00.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// A logged-out session whose login succeeds and reports `tier`.
pub fn session(tier: &str) -> Session {
    with_tiers(FixedTierService::new(tier))
}

pub fn with_tiers(tiers: FixedTierService) -> Session {
    Session::with_services(
        store(),
        RuntimeConfig::default(),
        Box::new(StaticTokenAuth::new("token")),
        Box::new(tiers),
    )
    .unwrap()
    .with_epoch(epoch())
}

/// A session that is logged in with the Pro tier.
pub fn pro() -> Session {
    let mut session = session("Pro");
    session.login().unwrap();
    session
}

/// Clipboard that shares its history with the test.
#[derive(Clone, Default)]
pub struct SharedClipboard {
    pub copies: Rc<RefCell<Vec<String>>>,
}

impl Clipboard for SharedClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.copies.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Clipboard that rejects every write.
pub struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn copy(&mut self, _text: &str) -> Result<()> {
        Err(Error::new(ErrorKind::Clipboard("access denied".to_string())))
    }
}
