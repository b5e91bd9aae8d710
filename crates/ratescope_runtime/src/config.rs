//! Runtime configuration.

use ratescope_debug::TracerConfig;
use ratescope_foundation::{DEFAULT_TIER, Error, FALLBACK_LIMIT, Result};

/// Subscription endpoint queried after login.
pub const DEFAULT_TIER_URL: &str = "http://localhost:3001/api/user/subscription";

/// Timing, fallbacks, and collaborators' settings for a [`Session`](crate::Session).
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Delay before the first usage sample after a selection.
    pub initial_delay_ms: u64,
    /// Period of usage samples, measured from the selection.
    pub poll_interval_ms: u64,
    /// Delay before a blurred suggestion box hides.
    pub blur_delay_ms: u64,
    /// How long the "copied" indicator stays up.
    pub copy_feedback_ms: u64,
    /// Usage limit when a rule's sustained limit is not a positive integer.
    pub fallback_limit: u32,
    /// Seconds from a sample until its reported reset time.
    pub reset_window_secs: i64,
    /// Tier applied when the subscription fetch fails.
    pub default_tier: String,
    /// Subscription endpoint URL.
    pub tier_url: String,
    /// Seed for simulated usage.
    pub seed: u64,
    /// Session event tracing.
    pub tracer: TracerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            poll_interval_ms: 10_000,
            blur_delay_ms: 150,
            copy_feedback_ms: 1_500,
            fallback_limit: FALLBACK_LIMIT,
            reset_window_secs: 60,
            default_tier: DEFAULT_TIER.to_string(),
            tier_url: DEFAULT_TIER_URL.to_string(),
            seed: 42,
            tracer: TracerConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the initial sample delay.
    #[must_use]
    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    /// Builder method to set the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Builder method to set the suggestion blur delay.
    #[must_use]
    pub fn with_blur_delay(mut self, ms: u64) -> Self {
        self.blur_delay_ms = ms;
        self
    }

    /// Builder method to set the fallback usage limit.
    #[must_use]
    pub fn with_fallback_limit(mut self, limit: u32) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// Builder method to set the tier used when the fetch fails.
    #[must_use]
    pub fn with_default_tier(mut self, tier: impl Into<String>) -> Self {
        self.default_tier = tier.into();
        self
    }

    /// Builder method to set the subscription endpoint.
    #[must_use]
    pub fn with_tier_url(mut self, url: impl Into<String>) -> Self {
        self.tier_url = url.into();
        self
    }

    /// Builder method to set the usage seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the tracer configuration.
    #[must_use]
    pub fn with_tracer(mut self, tracer: TracerConfig) -> Self {
        self.tracer = tracer;
        self
    }

    /// Checks the configuration for values the session cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero poll interval, a zero
    /// fallback limit, or an empty tier URL.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::config("poll interval must be positive"));
        }
        if self.fallback_limit == 0 {
            return Err(Error::config("fallback limit must be positive"));
        }
        if self.tier_url.trim().is_empty() {
            return Err(Error::config("tier URL must not be empty"));
        }
        Ok(())
    }
}
