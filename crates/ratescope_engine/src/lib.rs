//! Filter cascade, option derivation, search, and selection for Ratescope.
//!
//! This crate provides:
//! - [`FilterState`] - Current selections and the reset cascade
//! - [`OptionDeriver`] - Dropdown choices per dimension
//! - [`SearchMatcher`] - Free-text matching and path suggestions
//! - [`ResultResolver`] - Final result list and API grouping
//! - [`SelectionController`] - The single-selection state machine
//! - [`LookupEngine`] - All of the above kept consistent behind memoized views

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod filter;
pub mod lookup;
pub mod memo;
pub mod options;
pub mod resolve;
pub mod search;
pub mod selection;

mod proptests;

pub use filter::{CASCADE, CascadeEffect, CascadeRule, Dimensions, FilterState, propagate};
pub use lookup::{LookupEngine, Update, ViewStats};
pub use memo::Memo;
pub use options::{FilterOptions, OptionDeriver, Readiness};
pub use resolve::{GroupedResults, Outcome, Resolution, ResolveMode, ResultResolver};
pub use search::{SUGGESTION_LIMIT, SearchMatcher, normalize};
pub use selection::{SelectionCause, SelectionChange, SelectionController};
