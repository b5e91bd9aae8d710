//! End-to-end tests over the bundled rule table
//!
//! These drive a full session through the root crate's re-exports: login,
//! filtering, search, suggestion picks, usage sampling, and tier changes.

mod lookup_flow;
mod tier_change;

use chrono::NaiveDate;
use ratescope::runtime::{FixedTierService, RuntimeConfig, Session, StaticTokenAuth};
use ratescope::storage::source::builtin;

/// A logged-out session over the bundled table whose login reports `tier`.
pub fn session(tier: &str) -> Session {
    Session::with_services(
        builtin().unwrap(),
        RuntimeConfig::default(),
        Box::new(StaticTokenAuth::new("token")),
        Box::new(FixedTierService::new(tier)),
    )
    .unwrap()
    .with_epoch(
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap(),
    )
}
