//! Trace event and record types.
//!
//! This module defines the session events that can be traced: filter
//! changes, selection transitions, usage sampling, and the tier fetch.

use ratescope_engine::SelectionCause;
use ratescope_foundation::{Dimension, RuleId};

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced during a lookup session.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A dropdown value was selected or cleared.
    FilterSelected {
        /// The dimension that changed.
        dimension: Dimension,
        /// The new value, `None` when cleared.
        value: Option<String>,
    },

    /// A filter change cleared narrower dimensions.
    CascadeReset {
        /// The dimension whose change fired the cascade.
        trigger: Dimension,
        /// The dimensions that were cleared.
        cleared: Vec<Dimension>,
    },

    /// The search text changed.
    QueryChanged {
        /// The raw search text.
        query: String,
        /// Number of results after the change.
        results: usize,
    },

    /// A path suggestion was picked.
    SuggestionPicked {
        /// The picked path.
        path: String,
        /// The rule it resolved to, if any.
        matched: Option<RuleId>,
    },

    /// The active selection changed.
    SelectionChanged {
        /// Previously selected rule.
        from: Option<RuleId>,
        /// Newly selected rule.
        to: Option<RuleId>,
        /// What caused the change.
        cause: SelectionCause,
    },

    /// Usage polling started for a rule.
    SamplingStarted {
        /// The sampled rule.
        rule: RuleId,
        /// The usage limit in effect.
        limit: u32,
    },

    /// Usage polling stopped.
    SamplingStopped {
        /// The rule that was being sampled.
        rule: RuleId,
    },

    /// A usage sample was delivered.
    UsageSampled {
        /// The sampled rule.
        rule: RuleId,
        /// Simulated current usage.
        usage: u32,
        /// The usage limit.
        limit: u32,
    },

    /// The authentication state changed.
    AuthChanged {
        /// Whether the user is now authenticated.
        authenticated: bool,
    },

    /// A subscription tier request was issued.
    TierRequested {
        /// Authentication generation the request belongs to.
        generation: u64,
    },

    /// A subscription tier request completed.
    TierFetched {
        /// The tier now in effect.
        tier: String,
        /// Whether the service answered successfully.
        success: bool,
        /// Failure description.
        message: Option<String>,
    },

    /// A tier response arrived for a superseded request and was dropped.
    TierFetchIgnored {
        /// Generation of the stale request.
        generation: u64,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FilterSelected { .. } => "filter-selected",
            Self::CascadeReset { .. } => "cascade-reset",
            Self::QueryChanged { .. } => "query-changed",
            Self::SuggestionPicked { .. } => "suggestion-picked",
            Self::SelectionChanged { .. } => "selection-changed",
            Self::SamplingStarted { .. } => "sampling-started",
            Self::SamplingStopped { .. } => "sampling-stopped",
            Self::UsageSampled { .. } => "usage-sampled",
            Self::AuthChanged { .. } => "auth-changed",
            Self::TierRequested { .. } => "tier-requested",
            Self::TierFetched { .. } => "tier-fetched",
            Self::TierFetchIgnored { .. } => "tier-fetch-ignored",
        }
    }

    /// Returns true if this event came from the filter cascade or search.
    #[must_use]
    pub fn is_filter_event(&self) -> bool {
        matches!(
            self,
            Self::FilterSelected { .. }
                | Self::CascadeReset { .. }
                | Self::QueryChanged { .. }
                | Self::SuggestionPicked { .. }
        )
    }

    /// Returns true if this event came from usage sampling.
    #[must_use]
    pub fn is_sampling_event(&self) -> bool {
        matches!(
            self,
            Self::SamplingStarted { .. } | Self::SamplingStopped { .. } | Self::UsageSampled { .. }
        )
    }

    /// Returns true if this event came from authentication or the tier fetch.
    #[must_use]
    pub fn is_tenant_event(&self) -> bool {
        matches!(
            self,
            Self::AuthChanged { .. }
                | Self::TierRequested { .. }
                | Self::TierFetched { .. }
                | Self::TierFetchIgnored { .. }
        )
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A trace event stamped with its session step and virtual time.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    /// Unique record ID within the session.
    pub id: u64,
    /// The user step (command) during which the event occurred.
    pub step: u64,
    /// Virtual clock time in milliseconds.
    pub at_ms: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, step: u64, at_ms: u64, event: TraceEvent) -> Self {
        Self {
            id,
            step,
            at_ms,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// =============================================================================
// Tests
// =============================================================================
