//! Session event tracing for Ratescope.
//!
//! This crate provides:
//! - [`Tracer`] - Bounded, switchable recording of session events
//! - [`TraceBuffer`] - Ring buffer of [`TraceRecord`]s indexed by step
//! - [`HumanFormatter`] and [`JsonFormatter`] - Output formats

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod trace;

pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceBufferStats, TraceEvent, TraceFormatter,
    TraceOutput, TraceRecord, Tracer, TracerConfig,
};
