//! Result resolution and grouping.
//!
//! A non-empty query selects search mode: the search predicate runs over the
//! tier slice and the dropdowns are ignored (but kept). Otherwise the API,
//! endpoint type, and method filters are applied conjunctively, each skipped
//! when unselected.

use std::collections::BTreeMap;

use ratescope_foundation::RuleId;
use ratescope_storage::{RuleStore, StoredRule};

use crate::filter::FilterState;
use crate::search::SearchMatcher;

// =============================================================================
// Resolution
// =============================================================================

/// Which logic produced the result list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveMode {
    /// Free-text search over path, endpoint type, and API.
    Search,
    /// Dropdown filters.
    Filter,
}

/// How a result list should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing matched and no constraint is active.
    Empty,
    /// Nothing matched an active constraint.
    NoDataFound,
    /// At least one rule matched.
    Found(usize),
}

/// The resolved, flat result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Which logic produced the list.
    pub mode: ResolveMode,
    /// Matching rules in store order.
    pub rules: RuleStore,
    constrained: bool,
}

impl Resolution {
    /// Returns the number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the result ids in store order.
    #[must_use]
    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.ids()
    }

    /// Returns the only result, if there is exactly one.
    #[must_use]
    pub fn unique(&self) -> Option<&StoredRule> {
        let mut iter = self.rules.iter();
        match (iter.next(), iter.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Classifies the result list for presentation.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.len() {
            0 if self.constrained => Outcome::NoDataFound,
            0 => Outcome::Empty,
            n => Outcome::Found(n),
        }
    }

    /// Groups the results by API.
    #[must_use]
    pub fn grouped(&self) -> GroupedResults {
        let mut groups: BTreeMap<String, Vec<StoredRule>> = BTreeMap::new();
        for stored in &self.rules {
            groups
                .entry(stored.api.clone())
                .or_default()
                .push(stored.clone());
        }
        GroupedResults { groups }
    }
}

// =============================================================================
// Grouped Results
// =============================================================================

/// Results keyed by API name, iterated in ascending API order.
///
/// Rules keep store order within each group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupedResults {
    groups: BTreeMap<String, Vec<StoredRule>>,
}

impl GroupedResults {
    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the rules of one API group.
    #[must_use]
    pub fn group(&self, api: &str) -> Option<&[StoredRule]> {
        self.groups.get(api).map(Vec::as_slice)
    }

    /// Iterates `(api, rules)` in ascending API order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StoredRule])> {
        self.groups
            .iter()
            .map(|(api, rules)| (api.as_str(), rules.as_slice()))
    }

    /// Returns the API names in display order.
    #[must_use]
    pub fn apis(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }
}

// =============================================================================
// Result Resolver
// =============================================================================

/// Produces the final result list.
pub struct ResultResolver;

impl ResultResolver {
    /// Resolves results over `tier_slice` (the store already narrowed by tier).
    #[must_use]
    pub fn resolve(tier_slice: &RuleStore, filters: &FilterState) -> Resolution {
        let matcher = SearchMatcher::new(filters.query());
        let constrained = !matcher.is_empty() || filters.tier().is_some();

        if !matcher.is_empty() {
            return Resolution {
                mode: ResolveMode::Search,
                rules: tier_slice.filter(|rule| matcher.matches(rule)),
                constrained,
            };
        }

        let rules = tier_slice
            .for_api(filters.api())
            .for_endpoint_type(filters.endpoint_type())
            .for_method(filters.method());

        Resolution {
            mode: ResolveMode::Filter,
            rules,
            constrained,
        }
    }
}
