//! Free-text path search.
//!
//! Queries are matched as case-insensitive substrings. A non-empty query
//! produces path suggestions and, in the resolver, replaces dropdown
//! filtering entirely.

use std::collections::HashSet;

use ratescope_foundation::{Rule, is_applicable};
use ratescope_storage::RuleStore;

/// Maximum number of path suggestions offered.
pub const SUGGESTION_LIMIT: usize = 5;

/// Lowercases and trims a query.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Matches rules against a normalized query.
#[derive(Clone, Debug)]
pub struct SearchMatcher {
    needle: String,
}

impl SearchMatcher {
    /// Creates a matcher, normalizing `query`.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            needle: normalize(query),
        }
    }

    /// Returns true if the normalized query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Returns the normalized query.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns true if the rule's path, endpoint type, or API contains the query.
    #[must_use]
    pub fn matches(&self, rule: &Rule) -> bool {
        contains_folded(&rule.path, &self.needle)
            || contains_folded(&rule.endpoint_type, &self.needle)
            || contains_folded(&rule.api, &self.needle)
    }

    /// Returns up to [`SUGGESTION_LIMIT`] distinct paths containing the query.
    ///
    /// Paths come from `store` in store order; sentinel paths are skipped.
    /// An empty query suggests nothing.
    #[must_use]
    pub fn suggestions(&self, store: &RuleStore) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        store
            .iter()
            .map(|stored| stored.path.as_str())
            .filter(|path| is_applicable(path))
            .filter(|path| seen.insert(*path))
            .filter(|path| contains_folded(path, &self.needle))
            .take(SUGGESTION_LIMIT)
            .map(str::to_string)
            .collect()
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
