//! Rate-limit rule records and their identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::limits::parse_leading_int;

/// Sentinel marking a dimension as not applicable to a rule.
pub const NOT_APPLICABLE: &str = "N/A";

/// Tier assumed when the subscription service cannot be reached.
pub const DEFAULT_TIER: &str = "Free";

/// Units label that marks a rule as high-risk on its own.
const PER_SECOND: &str = "per second";

/// Sustained limits strictly below this are considered very low.
const VERY_LOW_THRESHOLD: i64 = 5;

/// Returns true if `value` carries information for its dimension.
///
/// Empty strings and the [`NOT_APPLICABLE`] sentinel do not.
#[must_use]
pub fn is_applicable(value: &str) -> bool {
    !value.is_empty() && value != NOT_APPLICABLE
}

/// Stable identifier of a rule: its position in the loaded store.
///
/// Paths are not unique, so identity comparisons (toggling a selected card)
/// go through the id rather than the record contents.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleId(u32);

impl RuleId {
    /// Creates a rule id from a store position.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the store position.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleId({})", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a rule is flagged as high-risk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskReason {
    /// The sustained limit is expressed per second.
    PerSecond,
    /// The sustained limit is below five.
    VeryLowLimit,
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerSecond => write!(f, "per-second limit"),
            Self::VeryLowLimit => write!(f, "very low limit"),
        }
    }
}

/// One rate-limit rule.
///
/// Field names on the wire follow the published rate-limit table
/// (`API`, `SubscriptionType`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// API group (e.g. "Management").
    #[cfg_attr(feature = "serde", serde(rename = "API"))]
    pub api: String,
    /// Subscription tier, or [`NOT_APPLICABLE`].
    #[cfg_attr(feature = "serde", serde(rename = "SubscriptionType"))]
    pub subscription_type: String,
    /// Endpoint category label.
    #[cfg_attr(feature = "serde", serde(rename = "EndpointType"))]
    pub endpoint_type: String,
    /// URL path pattern.
    #[cfg_attr(feature = "serde", serde(rename = "Path"))]
    pub path: String,
    /// Comma-separated HTTP verbs.
    #[cfg_attr(feature = "serde", serde(rename = "Method"))]
    pub method: String,
    /// Burst capacity.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "BurstLimit", default, deserialize_with = "wire::text")
    )]
    pub burst_limit: String,
    /// Sustained capacity.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "SustainedLimit", default, deserialize_with = "wire::text")
    )]
    pub sustained_limit: String,
    /// Unit of the sustained capacity ("per second", "per minute", ...).
    #[cfg_attr(feature = "serde", serde(rename = "SustainedLimitUnits", default))]
    pub sustained_limit_units: String,
    /// Request context.
    #[cfg_attr(feature = "serde", serde(rename = "Notes", default))]
    pub notes: String,
}

impl Rule {
    /// Creates a rule with empty limits and notes.
    #[must_use]
    pub fn new(
        api: impl Into<String>,
        subscription_type: impl Into<String>,
        endpoint_type: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            api: api.into(),
            subscription_type: subscription_type.into(),
            endpoint_type: endpoint_type.into(),
            path: path.into(),
            method: method.into(),
            burst_limit: String::new(),
            sustained_limit: String::new(),
            sustained_limit_units: String::new(),
            notes: String::new(),
        }
    }

    /// Sets the limit columns.
    #[must_use]
    pub fn with_limits(
        mut self,
        burst: impl Into<String>,
        sustained: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        self.burst_limit = burst.into();
        self.sustained_limit = sustained.into();
        self.sustained_limit_units = units.into();
        self
    }

    /// Sets the notes column.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Iterates the individual method tokens, trimmed, skipping empties.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.method
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Returns true if `method` is one of this rule's method tokens.
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        self.methods().any(|m| m == method)
    }

    /// Returns the first method token, or an empty string.
    #[must_use]
    pub fn primary_method(&self) -> &str {
        self.methods().next().unwrap_or("")
    }

    /// Returns the leading integer of the sustained limit, if any.
    #[must_use]
    pub fn sustained_limit_value(&self) -> Option<i64> {
        parse_leading_int(&self.sustained_limit)
    }

    /// Returns every reason this rule is considered high-risk.
    #[must_use]
    pub fn risk_reasons(&self) -> Vec<RiskReason> {
        let mut reasons = Vec::new();
        if self.sustained_limit_units == PER_SECOND {
            reasons.push(RiskReason::PerSecond);
        }
        if self
            .sustained_limit_value()
            .is_some_and(|n| (0..VERY_LOW_THRESHOLD).contains(&n))
        {
            reasons.push(RiskReason::VeryLowLimit);
        }
        reasons
    }

    /// Returns true if the rule has a per-second or very low sustained limit.
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        !self.risk_reasons().is_empty()
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
    }

    /// Accepts limit columns written either as strings or as JSON numbers.
    pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Text::deserialize(deserializer)? {
            Text::Str(s) => s,
            Text::Int(n) => n.to_string(),
            Text::Float(x) => x.to_string(),
        })
    }
}
