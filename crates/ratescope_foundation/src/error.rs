//! Error types for the Ratescope system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::dimension::Dimension;
use crate::rule::RuleId;

/// Result alias used throughout Ratescope.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Ratescope operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an error for a dimension whose prerequisite is not selected.
    #[must_use]
    pub fn not_ready(dimension: Dimension, missing: Dimension) -> Self {
        Self::new(ErrorKind::NotReady { dimension, missing })
    }

    /// Creates an error for a value not offered by the current option list.
    #[must_use]
    pub fn unknown_option(dimension: Dimension, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownOption {
            dimension,
            value: value.into(),
        })
    }

    /// Creates a rule not found error.
    #[must_use]
    pub fn rule_not_found(id: RuleId) -> Self {
        Self::new(ErrorKind::RuleNotFound(id))
    }

    /// Creates an invalid record error.
    #[must_use]
    pub fn invalid_record(index: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRecord {
            index,
            message: message.into(),
        })
    }

    /// Creates a tier fetch error.
    #[must_use]
    pub fn tier_fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TierFetch(message.into()))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Creates an error for a malformed REPL command.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Command(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A dimension was selected before its prerequisite.
    #[error("{dimension} filter is not available until a {missing} is selected")]
    NotReady {
        /// The dimension the caller tried to use.
        dimension: Dimension,
        /// The first missing prerequisite.
        missing: Dimension,
    },

    /// A value was selected that the current option list does not offer.
    #[error("unknown {dimension}: {value}")]
    UnknownOption {
        /// The dimension being selected.
        dimension: Dimension,
        /// The rejected value.
        value: String,
    },

    /// Rule id does not exist in the store.
    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    /// Suggestion index is outside the current suggestion list.
    #[error("no suggestion at position {index} (have {length})")]
    SuggestionOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of suggestions currently shown.
        length: usize,
    },

    /// A rule record could not be loaded.
    #[error("invalid rule record #{index}: {message}")]
    InvalidRecord {
        /// Position of the record in its source.
        index: usize,
        /// Description of the problem.
        message: String,
    },

    /// Authentication is required for this operation.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The tier comes from the subscription service and override is off.
    #[error("tier is set by your subscription; turn override on to choose one")]
    TierLocked,

    /// The identity provider failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The subscription tier could not be fetched.
    #[error("tier fetch failed: {0}")]
    TierFetch(String),

    /// Clipboard write failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Invalid configuration or command-line input.
    #[error("configuration error: {0}")]
    Config(String),

    /// A REPL command was malformed.
    #[error("{0}")]
    Command(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or data set name.
    pub source: Option<String>,
    /// Record index within the source.
    pub record: Option<usize>,
    /// Chain of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the record index.
    #[must_use]
    pub fn with_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(record) = self.record {
                write!(f, " (record #{record})")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}
