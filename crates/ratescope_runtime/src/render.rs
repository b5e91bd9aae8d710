//! Plain-text views of a session for the REPL.

use std::fmt::Write as _;

use ratescope_engine::Outcome;
use ratescope_foundation::{Dimension, is_applicable};
use ratescope_storage::StoredRule;

use crate::sampler::{UsageSample, UsageStatus};
use crate::session::Session;

/// Width of the usage gauge in characters.
const GAUGE_WIDTH: usize = 20;

/// Renders the dropdown choices and which controls are usable.
#[must_use]
pub fn options(session: &Session) -> String {
    let engine = session.engine();
    let filters = engine.filters();
    let readiness = engine.readiness();
    let options = engine.options();

    let rows = [
        (Dimension::Tier, session.can_choose_tier()),
        (Dimension::Api, readiness.api),
        (Dimension::EndpointType, readiness.endpoint_type),
        (Dimension::Method, readiness.method),
    ];

    let mut out = String::new();
    for (dimension, enabled) in rows {
        let current = filters.value(dimension).unwrap_or("-");
        let choices = options.for_dimension(dimension);
        let _ = write!(out, "{:<14} [{current}]", dimension.label());
        if !enabled {
            out.push_str(" (locked)");
        }
        if choices.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {}", choices.join(" | "));
        }
    }

    if readiness.dropdowns_overridden {
        out.push_str("search overrides the dropdowns\n");
    }
    let _ = writeln!(out, "{:<14} [{}]", Dimension::Query.label(), filters.query());
    out
}

/// Renders the suggestion box, marking the highlighted entry.
#[must_use]
pub fn suggestions(session: &Session) -> String {
    let highlighted = session.suggestion_box().highlighted();
    let mut out = String::new();
    for (i, path) in session.visible_suggestions().iter().enumerate() {
        let marker = if highlighted == Some(i) { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {i}: {path}");
    }
    out
}

/// Renders the result list grouped by API.
#[must_use]
pub fn results(session: &Session) -> String {
    let engine = session.engine();
    match engine.outcome() {
        Outcome::Empty => "no rules loaded\n".to_string(),
        Outcome::NoDataFound => "no data found\n".to_string(),
        Outcome::Found(count) => {
            let mut out = String::new();
            let _ = writeln!(out, "{count} result{}", if count == 1 { "" } else { "s" });
            for (api, rules) in engine.grouped().iter() {
                let _ = writeln!(out, "{api} ({})", rules.len());
                for stored in rules {
                    out.push_str(&card(session, stored));
                }
            }
            out
        }
    }
}

fn card(session: &Session, stored: &StoredRule) -> String {
    let selected = session.engine().selected_id() == Some(stored.id());
    let mut out = String::new();
    let _ = write!(
        out,
        "  {} {:<5} {:<10} {}",
        if selected { '*' } else { ' ' },
        stored.id().to_string(),
        stored.method,
        stored.path
    );
    if session.copied() == Some(stored.id()) {
        out.push_str("  (copied!)");
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "          burst {}  sustained {} {}",
        stored.burst_limit, stored.sustained_limit, stored.sustained_limit_units
    );
    let reasons = stored.risk_reasons();
    if !reasons.is_empty() {
        let labels: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "          HIGH RISK: {}", labels.join(", "));
    }
    if selected && is_applicable(&stored.notes) {
        let _ = writeln!(out, "          {}", stored.notes);
    }
    out
}

/// Renders the usage panel for the selected rule.
#[must_use]
pub fn usage(session: &Session) -> String {
    match session.usage() {
        UsageStatus::Idle => String::new(),
        UsageStatus::Loading => "usage: loading...\n".to_string(),
        UsageStatus::Ready(sample) => gauge(sample),
    }
}

/// Renders one usage reading as a bar.
#[must_use]
pub fn gauge(sample: &UsageSample) -> String {
    let fill = sample.fill_percent();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((fill / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    format!(
        "usage: [{}{}] {}/{} {} ({fill:.0}%, {}) {} resets {}\n",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        sample.current_usage,
        sample.limit,
        sample.limit_unit,
        sample.level(),
        sample.method,
        sample.reset_time
    )
}

/// Renders the authentication and tier status line.
#[must_use]
pub fn status(session: &Session) -> String {
    let auth = if session.is_authenticated() {
        "logged in"
    } else {
        "anonymous"
    };
    let source = if session.is_override() || !session.is_authenticated() {
        "manual"
    } else {
        "subscription"
    };
    let mut out = format!(
        "{auth} | tier {} ({source}) | fetch {} | override {}",
        session.effective_tier().unwrap_or("-"),
        session.fetch_status(),
        if session.is_override() { "on" } else { "off" }
    );
    if let Some(message) = session.fetch_message() {
        let _ = write!(out, " | {message}");
    }
    out.push('\n');
    out
}

/// Renders everything: status, filters, suggestions, results, usage.
#[must_use]
pub fn show(session: &Session) -> String {
    let mut out = status(session);
    out.push_str(&options(session));
    out.push_str(&suggestions(session));
    out.push_str(&results(session));
    out.push_str(&usage(session));
    out
}
