//! Ratescope - Rate-limit rule lookup engine
//!
//! This crate re-exports all layers of the Ratescope system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: ratescope_runtime    - Session, usage sampling, REPL, CLI
//! Layer 3: ratescope_debug      - Session event tracing
//! Layer 2: ratescope_engine     - Filter cascade, options, search, resolution, selection
//! Layer 1: ratescope_storage    - Immutable rule store, JSON loading
//! Layer 0: ratescope_foundation - Core types (Rule, RuleId, Dimension, Error)
//! ```

pub use ratescope_debug as debug;
pub use ratescope_engine as engine;
pub use ratescope_foundation as foundation;
pub use ratescope_runtime as runtime;
pub use ratescope_storage as storage;
