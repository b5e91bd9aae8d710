//! Option derivation for the filter dropdowns.
//!
//! Each dimension's choices come from a successively narrower snapshot:
//!
//! ```text
//! full store ──────────────────────────────► tenants
//!     │ tier
//!     ▼
//! tier slice ──────────────────────────────► apis
//!     │ api
//!     ▼
//! api slice ───────────────────────────────► endpoint types
//!     │ endpoint type
//!     ▼
//! endpoint slice ──────────────────────────► methods (split per token)
//! ```
//!
//! Sentinel values are dropped and every list is sorted ascending.

use std::collections::BTreeSet;

use ratescope_foundation::{Dimension, is_applicable};
use ratescope_storage::RuleStore;

use crate::filter::FilterState;

// =============================================================================
// Filter Options
// =============================================================================

/// The valid choices for each dropdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Subscription tiers, from the whole store.
    pub tenants: Vec<String>,
    /// API groups within the tier.
    pub apis: Vec<String>,
    /// Endpoint types within the tier and API.
    pub endpoint_types: Vec<String>,
    /// Method tokens within the tier, API, and endpoint type.
    pub methods: Vec<String>,
}

impl FilterOptions {
    /// Returns the choices for a dimension. Search has none.
    #[must_use]
    pub fn for_dimension(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Tier => &self.tenants,
            Dimension::Api => &self.apis,
            Dimension::EndpointType => &self.endpoint_types,
            Dimension::Method => &self.methods,
            Dimension::Query => &[],
        }
    }

    /// Returns true if `value` is offered for `dimension`.
    #[must_use]
    pub fn offers(&self, dimension: Dimension, value: &str) -> bool {
        self.for_dimension(dimension).iter().any(|v| v == value)
    }
}

// =============================================================================
// Readiness
// =============================================================================

/// Which controls are usable given the current selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readiness {
    /// API dropdown (needs a tier).
    pub api: bool,
    /// Endpoint type dropdown (needs tier and API).
    pub endpoint_type: bool,
    /// Method dropdown (needs tier, API, and endpoint type).
    pub method: bool,
    /// Search box (needs a tier).
    pub search: bool,
    /// True while a search query overrides the dropdowns.
    pub dropdowns_overridden: bool,
}

impl Readiness {
    /// Computes readiness from the filter state.
    #[must_use]
    pub fn from_filters(filters: &FilterState) -> Self {
        Self {
            api: filters.is_ready(Dimension::Api),
            endpoint_type: filters.is_ready(Dimension::EndpointType),
            method: filters.is_ready(Dimension::Method),
            search: filters.is_ready(Dimension::Query),
            dropdowns_overridden: filters.is_search_active(),
        }
    }
}

// =============================================================================
// Option Deriver
// =============================================================================

/// Builds [`FilterOptions`] from a store and the broader selections.
pub struct OptionDeriver;

impl OptionDeriver {
    /// Derives the option lists.
    #[must_use]
    pub fn derive(
        store: &RuleStore,
        tier: Option<&str>,
        api: Option<&str>,
        endpoint_type: Option<&str>,
    ) -> FilterOptions {
        let tier_slice = store.for_tier(tier);
        let api_slice = tier_slice.for_api(api);
        let endpoint_slice = api_slice.for_endpoint_type(endpoint_type);

        FilterOptions {
            tenants: Self::collect(store.iter().map(|r| r.subscription_type.as_str())),
            apis: Self::collect(tier_slice.iter().map(|r| r.api.as_str())),
            endpoint_types: Self::collect(api_slice.iter().map(|r| r.endpoint_type.as_str())),
            methods: Self::collect(
                endpoint_slice
                    .iter()
                    .filter(|r| is_applicable(&r.method))
                    .flat_map(|r| r.methods()),
            ),
        }
    }

    /// Derives the option lists for a filter state.
    #[must_use]
    pub fn derive_for(store: &RuleStore, filters: &FilterState) -> FilterOptions {
        Self::derive(
            store,
            filters.tier(),
            filters.api(),
            filters.endpoint_type(),
        )
    }

    fn collect<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        values
            .filter(|v| is_applicable(v))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
