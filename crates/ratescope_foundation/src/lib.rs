//! Core types, rule records, and errors for Ratescope.
//!
//! This crate provides:
//! - [`Rule`] - One immutable rate-limit record
//! - [`RuleId`] - Stable identity of a rule within its store
//! - [`Dimension`] - The filter dimensions a user can narrow by
//! - [`Error`] - Rich error types with context
//! - Limit parsing helpers ([`parse_leading_int`], [`usage_limit`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dimension;
pub mod error;
pub mod limits;
pub mod rule;

pub use dimension::Dimension;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use limits::{FALLBACK_LIMIT, parse_leading_int, usage_limit};
pub use rule::{DEFAULT_TIER, NOT_APPLICABLE, RiskReason, Rule, RuleId, is_applicable};
