//! Structured log output for the binary.

use ratescope_foundation::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding log directives.
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// Directives used when [`LOG_ENV_VAR`] is unset.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// How log lines are written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Builds the log filter from the environment, or the default directives.
///
/// # Errors
///
/// Returns a configuration error if the directives do not parse.
pub fn log_filter() -> Result<EnvFilter> {
    if std::env::var(LOG_ENV_VAR).is_ok() {
        EnvFilter::builder()
            .with_env_var(LOG_ENV_VAR)
            .from_env()
            .map_err(|e| Error::config(format!("invalid `{LOG_ENV_VAR}`: {e}")))
    } else {
        EnvFilter::builder()
            .parse(DEFAULT_DIRECTIVES)
            .map_err(|e| Error::internal(format!("bad default log directives: {e}")))
    }
}

/// Installs the global log subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already
/// installed.
pub fn init(format: LogFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| Error::config(format!("failed to install logger: {e}")))
}
