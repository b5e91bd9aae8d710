//! Immutable rule store, snapshots, and rule table loading for Ratescope.
//!
//! This crate provides:
//! - [`RuleStore`] - Ordered rule snapshot with structural sharing
//! - [`StoredRule`] - A rule paired with its stable id
//! - [`source`] - JSON loading, including the bundled rule table

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod source;
pub mod store;

pub use store::{RuleStore, StoredRule};
