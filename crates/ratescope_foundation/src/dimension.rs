//! Filter dimensions.

use std::fmt;

/// A dimension the user can narrow the rule table by.
///
/// Dimensions are ordered from broadest to narrowest. The search text is
/// modeled as the narrowest dimension so the reset cascade can clear it
/// alongside the dropdown selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Subscription tier.
    Tier,
    /// API group.
    Api,
    /// Endpoint category.
    EndpointType,
    /// HTTP method token.
    Method,
    /// Free-text search.
    Query,
}

impl Dimension {
    /// All dimensions, broadest first.
    pub const ALL: [Self; 5] = [
        Self::Tier,
        Self::Api,
        Self::EndpointType,
        Self::Method,
        Self::Query,
    ];

    /// Returns the dimensions that must be selected before this one is usable.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Dimension] {
        match self {
            Self::Tier => &[],
            Self::Api | Self::Query => &[Self::Tier],
            Self::EndpointType => &[Self::Tier, Self::Api],
            Self::Method => &[Self::Tier, Self::Api, Self::EndpointType],
        }
    }

    /// Returns the user-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier => "tier",
            Self::Api => "api",
            Self::EndpointType => "endpoint type",
            Self::Method => "method",
            Self::Query => "search",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
