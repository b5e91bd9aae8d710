//! Simulated usage sampling for the selected rule.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratescope_foundation::{Rule, usage_limit};

/// Usage ratio above which the gauge shows [`GaugeLevel::High`].
const HIGH_RATIO: f64 = 0.8;

/// Usage ratio above which the gauge shows [`GaugeLevel::Elevated`].
const ELEVATED_RATIO: f64 = 0.5;

/// Reset time format (wall-clock time of day).
const RESET_TIME_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Gauge
// =============================================================================

/// Severity band of the usage gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GaugeLevel {
    /// At most half the limit.
    Normal,
    /// Above half the limit.
    Elevated,
    /// Above 80% of the limit.
    High,
}

impl GaugeLevel {
    /// Classifies a usage ratio.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > HIGH_RATIO {
            Self::High
        } else if ratio > ELEVATED_RATIO {
            Self::Elevated
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for GaugeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::High => write!(f, "high"),
        }
    }
}

// =============================================================================
// Usage Sample
// =============================================================================

/// One simulated usage reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageSample {
    /// Requests used in the current window, `0..=limit`.
    pub current_usage: u32,
    /// Requests allowed in the window.
    pub limit: u32,
    /// Window unit label.
    pub limit_unit: String,
    /// Time of day at which the window resets.
    pub reset_time: String,
    /// The rule's first method token.
    pub method: String,
}

impl UsageSample {
    /// Returns usage as a fraction of the limit.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        f64::from(self.current_usage) / f64::from(self.limit)
    }

    /// Returns the gauge fill, capped at 100 percent.
    #[must_use]
    pub fn fill_percent(&self) -> f64 {
        (self.ratio() * 100.0).min(100.0)
    }

    /// Returns the gauge severity.
    #[must_use]
    pub fn level(&self) -> GaugeLevel {
        GaugeLevel::from_ratio(self.ratio())
    }
}

/// What the usage panel shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UsageStatus {
    /// No rule is being sampled.
    #[default]
    Idle,
    /// Sampling started, first reading pending.
    Loading,
    /// Latest reading.
    Ready(UsageSample),
}

impl UsageStatus {
    /// Returns the latest sample, if any.
    #[must_use]
    pub fn sample(&self) -> Option<&UsageSample> {
        match self {
            Self::Ready(sample) => Some(sample),
            _ => None,
        }
    }
}

// =============================================================================
// Usage Sampler
// =============================================================================

/// Produces deterministic simulated usage readings.
#[derive(Clone, Debug)]
pub struct UsageSampler {
    rng: ChaCha8Rng,
    fallback_limit: u32,
    reset_window: Duration,
}

impl UsageSampler {
    /// Creates a sampler with a seed and the fallback limit.
    #[must_use]
    pub fn new(seed: u64, fallback_limit: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fallback_limit,
            reset_window: Duration::seconds(60),
        }
    }

    /// Sets the time from a sample until its reported reset.
    #[must_use]
    pub fn with_reset_window(mut self, seconds: i64) -> Self {
        self.reset_window = Duration::seconds(seconds);
        self
    }

    /// Returns the usage limit that applies to `rule`.
    #[must_use]
    pub fn limit_for(&self, rule: &Rule) -> u32 {
        usage_limit(&rule.sustained_limit, self.fallback_limit)
    }

    /// Draws a reading for `rule` taken at wall-clock time `at`.
    pub fn sample(&mut self, rule: &Rule, at: NaiveDateTime) -> UsageSample {
        let limit = self.limit_for(rule);
        let reset = at + self.reset_window;
        UsageSample {
            current_usage: self.rng.gen_range(0..=limit),
            limit,
            limit_unit: rule.sustained_limit_units.clone(),
            reset_time: reset.format(RESET_TIME_FORMAT).to_string(),
            method: rule.primary_method().to_string(),
        }
    }
}
