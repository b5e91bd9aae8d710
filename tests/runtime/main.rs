//! Integration tests for Layer 4: Runtime
//!
//! Tests for the session: tier resolution, usage sampling, the suggestion
//! box, the clipboard, and scripted REPL runs.

mod fixtures;
mod scripts;
