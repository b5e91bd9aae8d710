//! Syntax highlighting for REPL commands.

use std::borrow::Cow;

/// Highlighter for REPL command lines.
pub struct CommandHighlighter {
    commands: Vec<String>,
}

impl CommandHighlighter {
    /// Creates a highlighter that knows the given command names.
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    /// Highlight a line of input.
    ///
    /// Known commands are cyan, unknown ones red. Rule ids (`#3`) are yellow
    /// and bare numbers magenta.
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Cow::Borrowed(line);
        }

        let indent = &line[..line.len() - trimmed.len()];
        let (command, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(c, r)| (c, r));

        let mut result = String::with_capacity(line.len() * 2);
        result.push_str(indent);
        let color = if self.commands.iter().any(|c| c == command) {
            "\x1b[36m" // cyan
        } else {
            "\x1b[31m" // red
        };
        result.push_str(color);
        result.push_str(command);
        result.push_str("\x1b[0m");

        if trimmed.len() > command.len() {
            result.push_str(&trimmed[command.len()..trimmed.len() - rest.len()]);
            result.push_str(&highlight_args(rest));
        }

        Cow::Owned(result)
    }
}

fn highlight_args(args: &str) -> String {
    let mut result = String::with_capacity(args.len() * 2);
    let mut chars = args.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '#' if chars.peek().is_some_and(char::is_ascii_digit) => {
                result.push_str("\x1b[33m"); // yellow
                result.push(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    result.push(next);
                    chars.next();
                }
                result.push_str("\x1b[0m");
            }
            c if c.is_ascii_digit() => {
                result.push_str("\x1b[35m"); // magenta
                result.push(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    result.push(next);
                    chars.next();
                }
                result.push_str("\x1b[0m");
            }
            _ => result.push(c),
        }
    }

    result
}
