//! Trace output formatters.
//!
//! Provides human-readable and JSON formatters for trace records.

use std::fmt::Write;

use ratescope_foundation::RuleId;
use serde_json::{Value, json};

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for formatting trace records.
pub trait TraceFormatter {
    /// Formats a single trace record to a string.
    fn format(&self, record: &TraceRecord) -> String;

    /// Formats multiple records.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        records
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn rule_or_none(rule: Option<RuleId>) -> String {
    rule.map_or_else(|| "none".to_string(), |id| id.to_string())
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats trace records in human-readable form.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to include virtual timestamps.
    pub show_timestamps: bool,
    /// Whether to include record IDs.
    pub show_ids: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show timestamps.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamps = true;
        self
    }

    /// Builder method to show record IDs.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }

    /// Formats virtual milliseconds as seconds once past one second.
    #[allow(clippy::cast_precision_loss)]
    fn format_timestamp(ms: u64) -> String {
        if ms >= 1000 {
            format!("{:.3}s", ms as f64 / 1000.0)
        } else {
            format!("{ms}ms")
        }
    }

    fn describe(event: &TraceEvent) -> String {
        match event {
            TraceEvent::FilterSelected { dimension, value } => match value {
                Some(value) => format!("SELECT {dimension} = {value}"),
                None => format!("SELECT {dimension} cleared"),
            },
            TraceEvent::CascadeReset { trigger, cleared } => {
                let names: Vec<_> = cleared.iter().map(ToString::to_string).collect();
                format!("  RESET by {trigger}: {}", names.join(", "))
            }
            TraceEvent::QueryChanged { query, results } => {
                format!("SEARCH {query:?} ({results} results)")
            }
            TraceEvent::SuggestionPicked { path, matched } => {
                format!("PICK {path} -> {}", rule_or_none(*matched))
            }
            TraceEvent::SelectionChanged { from, to, cause } => {
                format!(
                    "  SELECTION {} -> {} ({cause})",
                    rule_or_none(*from),
                    rule_or_none(*to)
                )
            }
            TraceEvent::SamplingStarted { rule, limit } => {
                format!("  SAMPLING {rule} started (limit {limit})")
            }
            TraceEvent::SamplingStopped { rule } => format!("  SAMPLING {rule} stopped"),
            TraceEvent::UsageSampled { rule, usage, limit } => {
                format!("    USAGE {rule} {usage}/{limit}")
            }
            TraceEvent::AuthChanged { authenticated } => {
                let state = if *authenticated { "logged in" } else { "logged out" };
                format!("AUTH {state}")
            }
            TraceEvent::TierRequested { generation } => {
                format!("  TIER requested (generation {generation})")
            }
            TraceEvent::TierFetched {
                tier,
                success,
                message,
            } => match (success, message) {
                (true, _) => format!("  TIER {tier}"),
                (false, Some(message)) => format!("  TIER {tier} (fallback: {message})"),
                (false, None) => format!("  TIER {tier} (fallback)"),
            },
            TraceEvent::TierFetchIgnored { generation } => {
                format!("  TIER response ignored (stale generation {generation})")
            }
        }
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut prefix = String::new();

        if self.show_ids {
            let _ = write!(prefix, "[{:06}] ", record.id);
        }

        let _ = write!(prefix, "S{:04} ", record.step);

        if self.show_timestamps {
            let _ = write!(prefix, "{:>10} ", Self::format_timestamp(record.at_ms));
        }

        format!("{prefix}{}", Self::describe(&record.event))
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats trace records as JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Builds the JSON object for one record.
    #[must_use]
    pub fn to_value(record: &TraceRecord) -> Value {
        let rule = |id: Option<RuleId>| id.map(RuleId::index);

        let data = match &record.event {
            TraceEvent::FilterSelected { dimension, value } => {
                json!({ "dimension": dimension.label(), "value": value })
            }
            TraceEvent::CascadeReset { trigger, cleared } => {
                let cleared: Vec<_> = cleared.iter().map(|d| d.label()).collect();
                json!({ "trigger": trigger.label(), "cleared": cleared })
            }
            TraceEvent::QueryChanged { query, results } => {
                json!({ "query": query, "results": results })
            }
            TraceEvent::SuggestionPicked { path, matched } => {
                json!({ "path": path, "matched": rule(*matched) })
            }
            TraceEvent::SelectionChanged { from, to, cause } => {
                json!({ "from": rule(*from), "to": rule(*to), "cause": cause.to_string() })
            }
            TraceEvent::SamplingStarted { rule, limit } => {
                json!({ "rule": rule.index(), "limit": limit })
            }
            TraceEvent::SamplingStopped { rule } => json!({ "rule": rule.index() }),
            TraceEvent::UsageSampled { rule, usage, limit } => {
                json!({ "rule": rule.index(), "usage": usage, "limit": limit })
            }
            TraceEvent::AuthChanged { authenticated } => {
                json!({ "authenticated": authenticated })
            }
            TraceEvent::TierRequested { generation }
            | TraceEvent::TierFetchIgnored { generation } => {
                json!({ "generation": generation })
            }
            TraceEvent::TierFetched {
                tier,
                success,
                message,
            } => json!({ "tier": tier, "success": success, "message": message }),
        };

        let mut object = json!({
            "id": record.id,
            "step": record.step,
            "at_ms": record.at_ms,
            "type": record.event_type(),
        });
        if let (Value::Object(target), Value::Object(fields)) = (&mut object, data) {
            target.extend(fields);
        }
        object
    }

    fn render(&self, value: &Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| value.to_string())
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        self.render(&Self::to_value(record))
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let items: Vec<_> = records.iter().map(|r| Self::to_value(r)).collect();
        self.render(&Value::Array(items))
    }
}

// =============================================================================
// Tests
// =============================================================================
