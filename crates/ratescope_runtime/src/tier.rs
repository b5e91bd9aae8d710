//! Subscription tier lookup.
//!
//! After login the session asks the subscription service which tier the
//! user is on. Requests are ticketed by authentication generation: a
//! response whose ticket no longer matches is dropped, so the latest login
//! always wins.

use std::fmt;
use std::time::Duration;

use ratescope_foundation::{Error, Result};
use serde::Deserialize;

/// Request timeout for the subscription service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Fetch Status
// =============================================================================

/// Progress of the subscription lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    /// No lookup for the current login.
    #[default]
    Idle,
    /// Lookup in flight.
    Loading,
    /// The service answered.
    Success,
    /// The lookup failed and the default tier applies.
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Identifies one tier request by the login it was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TierTicket {
    generation: u64,
}

impl TierTicket {
    /// Creates a ticket for an authentication generation.
    #[must_use]
    pub const fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// Returns the authentication generation.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

// =============================================================================
// Tier Service
// =============================================================================

/// Looks up a user's subscription tier.
pub trait TierService {
    /// Returns the tier name for the user owning `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TierFetch`](ratescope_foundation::ErrorKind::TierFetch)
    /// on transport failure, a non-success status, or a malformed body.
    fn fetch_tier(&self, token: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionResponse {
    subscription_type: String,
}

/// Queries the subscription endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTierService {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTierService {
    /// Creates a service for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::tier_fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TierService for HttpTierService {
    fn fetch_tier(&self, token: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .map_err(|e| Error::tier_fetch(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::tier_fetch(format!(
                "subscription service returned {status}"
            )));
        }

        let body: SubscriptionResponse = response
            .json()
            .map_err(|e| Error::tier_fetch(format!("malformed subscription response: {e}")))?;
        Ok(body.subscription_type)
    }
}

/// Answers every lookup with a fixed result.
#[derive(Clone, Debug)]
pub struct FixedTierService {
    outcome: std::result::Result<String, String>,
}

impl FixedTierService {
    /// Always returns `tier`.
    #[must_use]
    pub fn new(tier: impl Into<String>) -> Self {
        Self {
            outcome: Ok(tier.into()),
        }
    }

    /// Always fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl TierService for FixedTierService {
    fn fetch_tier(&self, _token: &str) -> Result<String> {
        self.outcome.clone().map_err(Error::tier_fetch)
    }
}
