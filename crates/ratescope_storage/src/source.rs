//! Loading rule tables from JSON.
//!
//! A rule table is a JSON array of records using the published column names
//! (`API`, `SubscriptionType`, `EndpointType`, `Path`, `Method`, ...). Each
//! record is decoded individually so errors point at the offending row.

use std::fs;
use std::path::Path;

use ratescope_foundation::{Error, ErrorContext, ErrorKind, Result, Rule};
use serde::Deserialize;

use crate::store::RuleStore;

/// The rule table bundled with the crate.
const BUILTIN_TABLE: &str = include_str!("../data/rate_limits.json");

/// Name reported in errors for the bundled table.
const BUILTIN_SOURCE: &str = "<builtin>";

/// Loads the bundled rule table.
///
/// # Errors
///
/// Returns an error if the bundled table is malformed.
pub fn builtin() -> Result<RuleStore> {
    from_json_str(BUILTIN_TABLE, BUILTIN_SOURCE)
}

/// Loads a rule table from a JSON string.
///
/// `source` names the table in error context.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array or a record is invalid.
pub fn from_json_str(text: &str, source: &str) -> Result<RuleStore> {
    let records: Vec<serde_json::Value> = serde_json::from_str(text).map_err(|e| {
        Error::new(ErrorKind::SerializationError(e.to_string()))
            .with_context(ErrorContext::new().with_source(source))
    })?;

    let rules = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| decode_record(index, record, source))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(source, rules = rules.len(), "loaded rule table");
    RuleStore::from_rules(rules)
}

/// Loads a rule table from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are invalid.
pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<RuleStore> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read rule table '{}': {e}",
            path.display()
        )))
    })?;
    from_json_str(&text, &path.display().to_string())
}

fn decode_record(index: usize, record: serde_json::Value, source: &str) -> Result<Rule> {
    let context = || ErrorContext::new().with_source(source).with_record(index);

    let rule = Rule::deserialize(record)
        .map_err(|e| Error::invalid_record(index, e.to_string()).with_context(context()))?;

    if rule.path.trim().is_empty() {
        return Err(Error::invalid_record(index, "empty `Path`").with_context(context()));
    }
    if rule.api.trim().is_empty() {
        return Err(Error::invalid_record(index, "empty `API`").with_context(context()));
    }
    Ok(rule)
}
