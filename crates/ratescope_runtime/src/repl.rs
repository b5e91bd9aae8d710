//! The main REPL implementation.

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::render;
use crate::session::Session;
use ratescope_engine::Update;
use ratescope_foundation::{Dimension, Error, ErrorContext, ErrorKind, Result, RuleId};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// Command names, in help order.
pub const COMMANDS: &[&str] = &[
    "tier", "api", "type", "method", "search", "clear", "up", "down", "enter", "hover", "focus",
    "blur", "pick", "click", "copy", "login", "logout", "override", "wait", "options", "show",
    "trace", "help", "quit",
];

/// Trace records shown by a bare `trace`.
const DEFAULT_TRACE_COUNT: usize = 20;

/// What a command asks the loop to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print the text and read the next command.
    Output(String),
    /// Leave the REPL.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The lookup session.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Whether wall time between commands advances the session clock.
    real_time: bool,

    /// When the previous command finished.
    last_input: Option<Instant>,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session) -> Result<Self> {
        let editor = RustylineEditor::new(COMMANDS)?;
        Ok(Self::with_editor(editor, session))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E, session: Session) -> Self {
        Self {
            editor,
            session,
            show_banner: true,
            prompt: "ratescope> ".to_string(),
            real_time: true,
            last_input: None,
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Stops wall time from advancing the session clock; only `wait` does.
    #[must_use]
    pub const fn without_real_time(mut self) -> Self {
        self.real_time = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        self.editor.set_values(self.completion_values());

        let line = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => {
                println!();
                return Ok(true);
            }
            ReadResult::Eof => return Ok(false),
        };

        self.catch_up();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&line);

        match self.execute(trimmed) {
            Ok(Reply::Output(text)) => {
                print!("{text}");
                let _ = io::stdout().flush();
                Ok(true)
            }
            Ok(Reply::Quit) => Ok(false),
            Err(e) => {
                print_error(&e);
                Ok(true)
            }
        }
    }

    /// Advances the session clock by the wall time since the last command.
    fn catch_up(&mut self) {
        let now = Instant::now();
        if self.real_time {
            if let Some(last) = self.last_input {
                let elapsed = u64::try_from(now.duration_since(last).as_millis()).unwrap_or(u64::MAX);
                self.session.advance(elapsed);
            }
        }
        self.last_input = Some(now);
    }

    /// Values offered for argument completion.
    fn completion_values(&self) -> Vec<String> {
        let options = self.session.engine().options();
        let mut values: Vec<String> = Dimension::ALL
            .into_iter()
            .flat_map(|d| options.for_dimension(d).iter().cloned())
            .chain(self.session.visible_suggestions().iter().cloned())
            .collect();
        values.extend(["on", "off", "-"].map(String::from));
        values.sort();
        values.dedup();
        values
    }

    /// Executes one command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is unknown, malformed, or rejected by
    /// the session.
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, a)| (c, a.trim()));

        let output = match command {
            "tier" => self.filter(Dimension::Tier, arg)?,
            "api" => self.filter(Dimension::Api, arg)?,
            "type" => self.filter(Dimension::EndpointType, arg)?,
            "method" => self.filter(Dimension::Method, arg)?,
            "search" => {
                self.session.search(arg)?;
                format!(
                    "{}{}",
                    render::suggestions(&self.session),
                    self.summary()
                )
            }
            "clear" => {
                self.session.clear_search()?;
                self.summary()
            }
            "up" => {
                self.session.key_up();
                render::suggestions(&self.session)
            }
            "down" => {
                self.session.key_down();
                render::suggestions(&self.session)
            }
            "enter" => match self.session.enter()? {
                Some(update) => self.after(update),
                None => String::new(),
            },
            "hover" => {
                self.session.hover(parse_number(arg, "hover")?);
                render::suggestions(&self.session)
            }
            "focus" => {
                self.session.focus();
                render::suggestions(&self.session)
            }
            "blur" => {
                self.session.blur();
                String::new()
            }
            "pick" => self.pick(arg)?,
            "click" => {
                let update = self.session.click(parse_rule_id(arg)?)?;
                self.after(update)
            }
            "copy" => {
                let path = self.session.copy(parse_rule_id(arg)?)?;
                format!("copied {path}\n")
            }
            "login" => {
                let status = self.session.login()?;
                format!("logged in, tier fetch {status}\n{}", self.summary())
            }
            "logout" => {
                self.session.logout();
                format!("logged out\n{}", self.summary())
            }
            "override" => {
                let on = match arg {
                    "on" => true,
                    "off" => false,
                    _ => return Err(Error::command("usage: override on|off")),
                };
                self.session.set_override(on);
                render::status(&self.session)
            }
            "wait" => {
                let fired = self.session.advance(parse_number(arg, "wait")?);
                format!(
                    "{} timer{} fired\n{}",
                    fired.len(),
                    if fired.len() == 1 { "" } else { "s" },
                    render::usage(&self.session)
                )
            }
            "options" => render::options(&self.session),
            "show" => render::show(&self.session),
            "trace" => self.trace(arg)?,
            "help" => help_text(),
            "quit" | "exit" => return Ok(Reply::Quit),
            other => return Err(Error::command(format!("unknown command: {other} (try help)"))),
        };
        Ok(Reply::Output(output))
    }

    fn filter(&mut self, dimension: Dimension, arg: &str) -> Result<String> {
        let value = match arg {
            "" | "-" => None,
            value => Some(value),
        };
        let update = self.session.select(dimension, value)?;
        Ok(self.after(update))
    }

    fn pick(&mut self, arg: &str) -> Result<String> {
        if arg.is_empty() {
            return Err(Error::command("usage: pick <n|path>"));
        }
        let update = match arg.parse::<usize>() {
            Ok(index) => self.session.pick_at(index)?,
            Err(_) => self.session.pick(arg)?,
        };
        Ok(self.after(update))
    }

    fn trace(&mut self, arg: &str) -> Result<String> {
        match arg {
            "on" => {
                self.session.tracer_mut().enable();
                return Ok("tracing on\n".to_string());
            }
            "off" => {
                self.session.tracer_mut().disable();
                return Ok("tracing off\n".to_string());
            }
            "clear" => {
                self.session.tracer_mut().clear();
                return Ok(String::new());
            }
            _ => {}
        }

        let count = if arg.is_empty() {
            DEFAULT_TRACE_COUNT
        } else {
            parse_number(arg, "trace")?
        };
        let tracer = self.session.tracer();
        if !tracer.is_enabled() && tracer.buffer().is_empty() {
            return Ok("tracing is off (use `trace on` or --trace)\n".to_string());
        }
        let records = tracer.buffer().recent(count);
        let mut text = tracer.format_records(&records);
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    /// Describes a selection change, then the results and usage.
    fn after(&self, update: Update) -> String {
        let mut out = String::new();
        if let Some(change) = update.selection {
            let target = change
                .to
                .map_or_else(|| "none".to_string(), |id| id.to_string());
            out.push_str(&format!("selected {target} ({})\n", change.cause));
        }
        out.push_str(&self.summary());
        out
    }

    fn summary(&self) -> String {
        format!(
            "{}{}",
            render::results(&self.session),
            render::usage(&self.session)
        )
    }

    /// Runs a command script, one command per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Stops at the
    /// first failing command or `quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a command fails; the
    /// error names the file and line.
    pub fn run_file(&mut self, path: &Path) -> Result<String> {
        let source = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        })?;
        self.run_script(&source, &path.display().to_string())
    }

    /// Runs commands from a string. See [`run_file`](Self::run_file).
    ///
    /// # Errors
    ///
    /// Returns the first command error, with the script line attached.
    pub fn run_script(&mut self, source: &str, name: &str) -> Result<String> {
        let mut transcript = String::new();
        for (number, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            transcript.push_str(&format!("> {line}\n"));
            match self.execute(line) {
                Ok(Reply::Output(text)) => transcript.push_str(&text),
                Ok(Reply::Quit) => break,
                Err(e) => {
                    return Err(e.with_context(
                        ErrorContext::new()
                            .with_source(name)
                            .with_frame(format!("running line {}: {line}", number + 1)),
                    ));
                }
            }
        }
        Ok(transcript)
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mratescope\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Rate limit lookup. Type `help` for commands, Ctrl+D to exit.\n");
        print!("{}", render::status(&self.session));

        // Flush to ensure banner appears
        let _ = io::stdout().flush();
    }
}

fn parse_number<T: std::str::FromStr>(arg: &str, command: &str) -> Result<T> {
    arg.parse()
        .map_err(|_| Error::command(format!("{command}: expected a number, got `{arg}`")))
}

fn parse_rule_id(arg: &str) -> Result<RuleId> {
    let digits = arg.strip_prefix('#').unwrap_or(arg);
    digits
        .parse()
        .map(RuleId::new)
        .map_err(|_| Error::command(format!("expected a rule id like #3, got `{arg}`")))
}

/// Prints an error and its context to stderr.
fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
    if let Some(context) = &error.context {
        eprintln!("\x1b[2m{context}\x1b[0m");
    }
}

fn help_text() -> String {
    "\
filters
  tier <name|->          choose the tier (manual or override only)
  api <name|->           choose the API group
  type <name|->          choose the endpoint type
  method <verb|->        choose the HTTP method
search
  search <text>          type into the search box
  clear                  empty the search box
  up | down | enter      move through suggestions, pick the highlighted one
  hover <n>              point at suggestion n
  focus | blur           focus or leave the search box
  pick <n|path>          pick a suggestion by position or path
results
  click <id>             select or deselect a result card
  copy <id>              copy a rule's path
account
  login | logout         sign in (fetches the tier) or out
  override on|off        choose the tier by hand while signed in
session
  wait <ms>              let time pass (usage samples arrive)
  options | show         print the dropdowns, or everything
  trace [n|on|off|clear] show recent session events
  help | quit
"
    .to_string()
}
