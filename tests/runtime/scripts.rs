//! Integration tests for the command interpreter
//!
//! Scripts run with real time disabled, so only `wait` moves the clock.

use ratescope_debug::TracerConfig;
use ratescope_foundation::{ErrorKind, Result};
use ratescope_runtime::{
    FixedTierService, LineEditor, ReadResult, Repl, Reply, RuntimeConfig, Session,
    StaticTokenAuth,
};

use crate::fixtures::{epoch, store};

/// Editor that replays fixed input lines, then reports EOF.
struct ScriptedEditor {
    lines: Vec<String>,
    next: usize,
}

impl ScriptedEditor {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
            next: 0,
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        let line = self.lines.get(self.next).cloned();
        self.next += 1;
        Ok(line.map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_values(&mut self, _values: Vec<String>) {}
}

fn repl(lines: &[&str]) -> Repl<ScriptedEditor> {
    let config = RuntimeConfig::default().with_tracer(TracerConfig::new().enabled());
    let session = Session::with_services(
        store(),
        config,
        Box::new(StaticTokenAuth::new("token")),
        Box::new(FixedTierService::new("Pro")),
    )
    .unwrap()
    .with_epoch(epoch());
    Repl::with_editor(ScriptedEditor::new(lines), session)
        .without_banner()
        .without_real_time()
}

fn output(repl: &mut Repl<ScriptedEditor>, line: &str) -> String {
    match repl.execute(line).unwrap() {
        Reply::Output(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn tier_then_search_selects_a_rule() {
    let mut repl = repl(&[]);
    output(&mut repl, "tier Pro");
    let text = output(&mut repl, "search logs");

    assert!(text.contains("1 result"));
    assert!(text.contains("/api/v2/logs"));
    assert_eq!(repl.session().engine().filters().query(), "logs");
}

#[test]
fn dash_clears_a_filter() {
    let mut repl = repl(&[]);
    output(&mut repl, "tier Pro");
    output(&mut repl, "api Management");
    output(&mut repl, "api -");
    assert_eq!(repl.session().engine().filters().api(), None);
}

#[test]
fn click_accepts_hash_ids() {
    let mut repl = repl(&[]);
    output(&mut repl, "tier Pro");
    let text = output(&mut repl, "click #1");
    assert!(text.contains("selected #1 (card clicked)"));

    let text = output(&mut repl, "click 1");
    assert!(text.contains("selected none (card toggled off)"));
}

#[test]
fn copy_reports_the_path() {
    let mut repl = repl(&[]);
    assert_eq!(output(&mut repl, "copy #2"), "copied /oauth/token\n");
}

#[test]
fn wait_reports_fired_timers() {
    let mut repl = repl(&[]);
    output(&mut repl, "login");
    output(&mut repl, "search logs");
    let text = output(&mut repl, "wait 500");
    assert!(text.starts_with("1 timer fired"));
    assert!(text.contains("usage: ["));
    assert!(text.contains("resets 09:01:00"));
}

#[test]
fn override_prints_the_status() {
    let mut repl = repl(&[]);
    output(&mut repl, "login");
    let text = output(&mut repl, "override on");
    assert!(text.starts_with("logged in | tier - (manual)"));
    assert!(text.contains("override on"));
}

#[test]
fn trace_shows_recent_events() {
    let mut repl = repl(&[]);
    output(&mut repl, "tier Pro");
    output(&mut repl, "search users");
    let text = output(&mut repl, "trace");
    assert!(text.contains("SEARCH \"users\" (1 results)"));

    assert_eq!(output(&mut repl, "trace off"), "tracing off\n");
    output(&mut repl, "trace clear");
    assert!(repl.session().tracer().buffer().is_empty());
}

#[test]
fn quit_ends_the_session() {
    let mut repl = repl(&[]);
    assert_eq!(repl.execute("quit").unwrap(), Reply::Quit);
    assert_eq!(repl.execute("exit").unwrap(), Reply::Quit);
}

// =============================================================================
// Command Errors
// =============================================================================

#[test]
fn unknown_command_is_a_command_error() {
    let mut repl = repl(&[]);
    let err = repl.execute("frobnicate").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Command(_)));
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn malformed_arguments_are_command_errors() {
    let mut repl = repl(&[]);
    for line in ["wait soon", "click abc", "override maybe", "pick"] {
        let err = repl.execute(line).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Command(_)), "{line}");
    }
}

#[test]
fn locked_tier_is_reported() {
    let mut repl = repl(&[]);
    output(&mut repl, "login");
    let err = repl.execute("tier Free").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TierLocked));
}

// =============================================================================
// Scripts
// =============================================================================

#[test]
fn script_transcript_echoes_commands() {
    let mut repl = repl(&[]);
    let transcript = repl
        .run_script(
            "# look up the logs endpoint\n\ntier Pro\nsearch logs\nquit\nsearch users\n",
            "lookup.txt",
        )
        .unwrap();

    assert!(transcript.starts_with("> tier Pro\n"));
    assert!(transcript.contains("> search logs\n"));
    assert!(!transcript.contains("> search users"));
    assert!(!transcript.contains("look up"));
}

#[test]
fn script_error_names_the_line() {
    let mut repl = repl(&[]);
    let err = repl
        .run_script("tier Pro\n\napi Billing\n", "lookup.txt")
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownOption { .. }));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("lookup.txt"));
    assert_eq!(context.stack, vec!["running line 3: api Billing".to_string()]);
}

#[test]
fn missing_script_file_is_an_io_error() {
    let mut repl = repl(&[]);
    let err = repl
        .run_file(std::path::Path::new("/nonexistent/ratescope/script.txt"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IoError(_)));
}

#[test]
fn run_loop_stops_at_eof() {
    let mut repl = repl(&["tier Pro", "", "search users", "bogus"]);
    repl.run().unwrap();
    assert_eq!(repl.session().engine().filters().query(), "users");
}
