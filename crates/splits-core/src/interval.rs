//! Timing intervals and the clock they are measured against
//!
//! An [`Interval`] is opened with a start instant and closed exactly once,
//! at which point its end instant and delta are recorded together. Instants
//! come from a [`Clock`] so tests can drive time by hand.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of timestamps for a registry
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Monotonic clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic measurements
///
/// Clones share the same offset, so a test can keep one handle and give
/// another to the registry.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset: Rc::new(Cell::new(Duration::ZERO)) }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move the clock forward by whole milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// One start/stop measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: Instant,
    end: Option<Instant>,
    delta: Option<Duration>,
}

impl Interval {
    /// Open a new interval at `start`
    pub fn open(start: Instant) -> Self {
        Self { start, end: None, delta: None }
    }

    /// Close the interval at `end`; returns the recorded delta
    ///
    /// Closing is only valid once. Callers check [`Interval::is_open`] first;
    /// a second call leaves the first measurement in place.
    pub(crate) fn close(&mut self, end: Instant) -> Duration {
        if let Some(delta) = self.delta {
            return delta;
        }
        let delta = end.saturating_duration_since(self.start);
        self.end = Some(end);
        self.delta = Some(delta);
        delta
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Option<Instant> {
        self.end
    }

    /// Recorded duration, absent while the interval is open
    pub fn delta(&self) -> Option<Duration> {
        self.delta
    }

    /// Closed delta, or the time elapsed so far according to `now`
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.delta.unwrap_or_else(|| now.saturating_duration_since(self.start))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delta {
            Some(delta) => write!(f, "{}ms", delta.as_millis()),
            None => write!(f, "running"),
        }
    }
}
