//! Authentication seam.
//!
//! The session only needs to know whether the user is logged in and to
//! obtain a bearer token for the subscription request.

use ratescope_foundation::{Error, ErrorKind, Result};

/// An identity provider.
pub trait Authenticator {
    /// Returns true if a user is logged in.
    fn is_authenticated(&self) -> bool;

    /// Returns true while the provider is still establishing its state.
    fn is_loading(&self) -> bool {
        false
    }

    /// Logs the user in.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot authenticate.
    fn login(&mut self) -> Result<()>;

    /// Logs the user out.
    fn logout(&mut self);

    /// Returns an access token for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotAuthenticated`] when logged out.
    fn token(&self) -> Result<String>;
}

/// Authenticates with a fixed, preconfigured token.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenAuth {
    token: Option<String>,
    authenticated: bool,
}

impl StaticTokenAuth {
    /// Creates an authenticator that logs in with `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            authenticated: false,
        }
    }

    /// Creates an authenticator with no token; login always fails.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns true if a token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Authenticator for StaticTokenAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn login(&mut self) -> Result<()> {
        if self.token.is_none() {
            return Err(Error::new(ErrorKind::Auth(
                "no access token configured (use --token or RATESCOPE_TOKEN)".to_string(),
            )));
        }
        self.authenticated = true;
        Ok(())
    }

    fn logout(&mut self) {
        self.authenticated = false;
    }

    fn token(&self) -> Result<String> {
        match (&self.token, self.authenticated) {
            (Some(token), true) => Ok(token.clone()),
            _ => Err(Error::new(ErrorKind::NotAuthenticated)),
        }
    }
}
