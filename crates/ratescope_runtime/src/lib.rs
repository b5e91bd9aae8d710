//! Session, usage sampling, REPL, and CLI for Ratescope.
//!
//! This crate provides:
//! - [`Session`] - Engine plus authentication, tier, sampling, and timers
//! - [`Repl`] - Interactive command loop over a session
//! - [`UsageSampler`] - Deterministic simulated usage readings
//! - [`Scheduler`] - Virtual clock with cancellable timers
//! - Collaborator seams: [`Authenticator`], [`TierService`], [`Clipboard`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod logging;
pub mod render;
pub mod repl;
pub mod sampler;
pub mod scheduler;
pub mod session;
pub mod suggest_box;
pub mod tier;

pub use auth::{Authenticator, StaticTokenAuth};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{DEFAULT_TIER_URL, RuntimeConfig};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use logging::LogFormat;
pub use repl::{COMMANDS, Repl, Reply};
pub use sampler::{GaugeLevel, UsageSample, UsageSampler, UsageStatus};
pub use scheduler::{Fired, Scheduler, Task, TaskHandle};
pub use session::Session;
pub use suggest_box::{EnterAction, SuggestionBox};
pub use tier::{FetchStatus, FixedTierService, HttpTierService, TierService, TierTicket};
