//! Splits Prelude
//!
//! This crate re-exports the items instrumented code reaches for most often, so
//! call sites need a single `use splits_prelude::*;` to start, stop and log
//! timers regardless of whether they hold a live timer or a stub.

#![deny(warnings)]
#![deny(missing_docs)]

// Timers and the shared contract --------------------------------------------------------------

pub use splits_core::{
    Instrument, StubTimer, Timer, TimerRegistry,
    // Factories
    create_stub, create_timer, create_timer_with,
};

// Configuration and failures ------------------------------------------------------------------

pub use splits_core::{TimerConfig, TimerError, TimerResult};

// When new crates expose stable public APIs, add re-exports here in a backwards-compatible
// manner.
