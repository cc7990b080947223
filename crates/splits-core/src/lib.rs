#![deny(warnings)]
#![allow(missing_docs)]
//! Named wall-clock timers for instrumenting sequential code.
//!
//! A [`TimerRegistry`] measures intervals under caller chosen keys, either in
//! order (`start`/`stop`) or by explicit id (`start_id`/`stop_id`), and renders
//! a summary with one line per key:
//!
//! ```text
//! TIMER RESULTS:
//! *   parse: 12ms
//! *   load: 2 x 1,300ms = 2,600ms
//! ```
//!
//! [`StubTimer`] implements the same calls as no-ops, and [`Timer`] switches
//! between the two so instrumentation can be disabled without editing call
//! sites.

/// Timer and report settings
pub mod config;
/// Error types for timer misuse and configuration
pub mod error;
/// Intervals and clock sources
pub mod interval;
/// The live registry state machine
pub mod registry;
/// Aggregation and text rendering
pub mod report;
/// Report destinations for `log()`
pub mod sink;
/// The no-op timer
pub mod stub;
/// Shared timer contract, live/stub switching and factories
pub mod timer;

pub use config::TimerConfig;
pub use error::{TimerError, TimerResult};
pub use interval::{Clock, Interval, ManualClock, MonotonicClock};
pub use registry::{AddressingMode, TimerEntry, TimerRegistry};
pub use report::{TimerReport, TimerSummary};
pub use sink::{BufferSink, ReportSink, SinkKind, StderrSink, StdoutSink, TracingSink};
pub use stub::StubTimer;
pub use timer::{Instrument, Timer, create_stub, create_timer, create_timer_with};
