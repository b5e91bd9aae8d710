//! Filter selection state and the reset cascade.
//!
//! Dimensions narrow in a fixed order: tier, then API, then endpoint type,
//! then method. Changing a broader dimension clears every narrower one and
//! the search text. The clearing rules live in one ordered table,
//! [`CASCADE`], and are applied by a single function, [`propagate`].

use bitflags::bitflags;
use ratescope_foundation::Dimension;

// =============================================================================
// Dimension Sets
// =============================================================================

bitflags! {
    /// A set of filter dimensions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Dimensions: u8 {
        /// Subscription tier.
        const TIER = 1 << 0;
        /// API group.
        const API = 1 << 1;
        /// Endpoint type.
        const ENDPOINT_TYPE = 1 << 2;
        /// Method token.
        const METHOD = 1 << 3;
        /// Search text.
        const QUERY = 1 << 4;
    }
}

impl From<Dimension> for Dimensions {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Tier => Self::TIER,
            Dimension::Api => Self::API,
            Dimension::EndpointType => Self::ENDPOINT_TYPE,
            Dimension::Method => Self::METHOD,
            Dimension::Query => Self::QUERY,
        }
    }
}

impl Dimensions {
    /// Iterates the contained dimensions, broadest first.
    pub fn dimensions(self) -> impl Iterator<Item = Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(move |d| self.contains(Self::from(*d)))
    }
}

// =============================================================================
// Cascade Table
// =============================================================================

/// One reset rule: changing `trigger` clears `resets`.
#[derive(Clone, Copy, Debug)]
pub struct CascadeRule {
    /// The dimension whose change fires this rule.
    pub trigger: Dimension,
    /// Dimensions cleared when the rule fires.
    pub resets: Dimensions,
    /// Whether the active selection is cleared as well.
    pub clears_selection: bool,
}

/// The reset rules, evaluated in order.
///
/// Resets only ever point from broader to narrower dimensions.
pub const CASCADE: &[CascadeRule] = &[
    CascadeRule {
        trigger: Dimension::Tier,
        resets: Dimensions::API
            .union(Dimensions::ENDPOINT_TYPE)
            .union(Dimensions::METHOD)
            .union(Dimensions::QUERY),
        clears_selection: true,
    },
    CascadeRule {
        trigger: Dimension::Api,
        resets: Dimensions::ENDPOINT_TYPE
            .union(Dimensions::METHOD)
            .union(Dimensions::QUERY),
        clears_selection: true,
    },
    CascadeRule {
        trigger: Dimension::EndpointType,
        resets: Dimensions::METHOD.union(Dimensions::QUERY),
        clears_selection: true,
    },
    CascadeRule {
        trigger: Dimension::Query,
        resets: Dimensions::empty(),
        clears_selection: true,
    },
];

/// What a change to one dimension clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeEffect {
    /// Dimensions that must be cleared.
    pub resets: Dimensions,
    /// Whether the active selection must be cleared.
    pub clears_selection: bool,
}

/// Computes everything a change to `trigger` clears.
///
/// Rules fired by cleared dimensions are applied as well, in table order, so
/// the result is the transitive closure of the table.
#[must_use]
pub fn propagate(trigger: Dimension) -> CascadeEffect {
    let mut fired = Dimensions::from(trigger);
    let mut effect = CascadeEffect {
        resets: Dimensions::empty(),
        clears_selection: false,
    };

    for rule in CASCADE {
        if fired.contains(Dimensions::from(rule.trigger)) {
            effect.resets |= rule.resets;
            effect.clears_selection |= rule.clears_selection;
            fired |= rule.resets;
        }
    }
    effect
}

// =============================================================================
// Filter State
// =============================================================================

/// The user's current filter selections and search text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    tier: Option<String>,
    api: Option<String>,
    endpoint_type: Option<String>,
    method: Option<String>,
    query: String,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the effective tier.
    #[must_use]
    pub fn tier(&self) -> Option<&str> {
        self.tier.as_deref()
    }

    /// Returns the selected API.
    #[must_use]
    pub fn api(&self) -> Option<&str> {
        self.api.as_deref()
    }

    /// Returns the selected endpoint type.
    #[must_use]
    pub fn endpoint_type(&self) -> Option<&str> {
        self.endpoint_type.as_deref()
    }

    /// Returns the selected method.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Returns the raw search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the search text lowercased and trimmed.
    #[must_use]
    pub fn normalized_query(&self) -> String {
        crate::search::normalize(&self.query)
    }

    /// Returns true if the normalized search text is non-empty.
    #[must_use]
    pub fn is_search_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Returns the value selected for a dimension.
    #[must_use]
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Tier => self.tier(),
            Dimension::Api => self.api(),
            Dimension::EndpointType => self.endpoint_type(),
            Dimension::Method => self.method(),
            Dimension::Query => Some(self.query.as_str()).filter(|q| !q.is_empty()),
        }
    }

    /// Returns the first prerequisite of `dimension` that is not selected.
    #[must_use]
    pub fn first_missing(&self, dimension: Dimension) -> Option<Dimension> {
        dimension
            .prerequisites()
            .iter()
            .copied()
            .find(|d| self.value(*d).is_none())
    }

    /// Returns true if every prerequisite of `dimension` is selected.
    #[must_use]
    pub fn is_ready(&self, dimension: Dimension) -> bool {
        self.first_missing(dimension).is_none()
    }

    /// Sets a dimension and applies the reset cascade.
    ///
    /// Empty strings are treated as clearing the dimension. The cascade fires
    /// even when the value is unchanged, so repeating a selection is
    /// idempotent.
    pub fn set(&mut self, dimension: Dimension, value: Option<String>) -> CascadeEffect {
        let value = value.filter(|v| !v.is_empty());
        let effect = propagate(dimension);
        self.clear(effect.resets);

        match dimension {
            Dimension::Tier => self.tier = value,
            Dimension::Api => self.api = value,
            Dimension::EndpointType => self.endpoint_type = value,
            Dimension::Method => self.method = value,
            Dimension::Query => self.query = value.unwrap_or_default(),
        }
        effect
    }

    /// Sets API and endpoint type directly, bypassing the cascade.
    ///
    /// Used when a picked suggestion back-fills the dropdowns from the rule it
    /// resolved to. The method depends on the endpoint type, so it is dropped;
    /// the search text is kept. Returns the dimensions that were cleared.
    pub fn backfill(&mut self, api: &str, endpoint_type: &str) -> Dimensions {
        self.api = Some(api.to_string()).filter(|v| !v.is_empty());
        self.endpoint_type = Some(endpoint_type.to_string()).filter(|v| !v.is_empty());
        if self.method.take().is_some() {
            Dimensions::METHOD
        } else {
            Dimensions::empty()
        }
    }

    /// Sets the search text without firing the cascade.
    pub fn set_query_silently(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Clears the given dimensions.
    pub fn clear(&mut self, dimensions: Dimensions) {
        for dimension in dimensions.dimensions() {
            match dimension {
                Dimension::Tier => self.tier = None,
                Dimension::Api => self.api = None,
                Dimension::EndpointType => self.endpoint_type = None,
                Dimension::Method => self.method = None,
                Dimension::Query => self.query.clear(),
            }
        }
    }

    /// Clears every dimension.
    pub fn reset(&mut self) {
        self.clear(Dimensions::all());
    }
}
