//! The live timer registry
//!
//! Keys are bound to an addressing mode by their first `start`:
//!
//! - `start(key)` / `stop(key)` keep an ordered list of intervals, and only
//!   the most recent one may be running.
//! - `start_id(key, id)` / `stop_id(key, id)` keep one interval per id, and an
//!   id can be started only once.
//!
//! Any call that breaks these rules fails with a [`TimerError`] and leaves the
//! registry unchanged. Keys report in the order they were first started.

use crate::config::{DEFAULT_EMPTY_MESSAGE, DEFAULT_HEADER, TimerConfig};
use crate::error::{TimerError, TimerResult};
use crate::interval::{Clock, Interval, MonotonicClock};
use crate::report::{self, TimerReport, TimerSummary};
use crate::sink::{ReportSink, StdoutSink};
use crate::stub::StubTimer;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// How the intervals of a key are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// Ordered intervals without ids
    Sequential,
    /// One interval per caller supplied id
    Keyed,
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressingMode::Sequential => write!(f, "sequential"),
            AddressingMode::Keyed => write!(f, "keyed"),
        }
    }
}

/// Intervals recorded under one key
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEntry {
    Sequential(Vec<Interval>),
    Keyed(IndexMap<String, Interval>),
}

impl TimerEntry {
    pub fn mode(&self) -> AddressingMode {
        match self {
            TimerEntry::Sequential(_) => AddressingMode::Sequential,
            TimerEntry::Keyed(_) => AddressingMode::Keyed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TimerEntry::Sequential(intervals) => intervals.len(),
            TimerEntry::Keyed(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry of named timers
pub struct TimerRegistry<C: Clock = MonotonicClock> {
    timers: IndexMap<String, TimerEntry>,
    clock: C,
    sink: Box<dyn ReportSink>,
    header: String,
    empty_message: String,
}

impl TimerRegistry {
    /// Create an empty registry on the monotonic clock, logging to stdout
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }

    /// Create an empty registry using the report settings and sink of `config`
    ///
    /// `config.enabled` is not consulted here; see [`crate::create_timer_with`].
    pub fn with_config(config: &TimerConfig) -> Self {
        let mut registry = Self::new();
        registry.header = config.header.clone();
        registry.empty_message = config.empty_message.clone();
        registry.sink = config.sink.build();
        registry
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerRegistry<C> {
    /// Create an empty registry reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            timers: IndexMap::new(),
            clock,
            sink: Box::new(StdoutSink),
            header: DEFAULT_HEADER.to_string(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    /// Replace the destination of [`TimerRegistry::log`]
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Start the next sequential interval for `key`
    pub fn start(&mut self, key: &str) -> TimerResult<&mut Self> {
        match self.timers.get_mut(key) {
            None => {
                let interval = Interval::open(self.clock.now());
                self.timers.insert(key.to_string(), TimerEntry::Sequential(vec![interval]));
            }
            Some(TimerEntry::Keyed(_)) => {
                return Err(rejected(TimerError::mode_conflict(
                    key,
                    None,
                    AddressingMode::Keyed,
                    AddressingMode::Sequential,
                )));
            }
            Some(TimerEntry::Sequential(intervals)) => {
                if intervals.last().is_some_and(Interval::is_open) {
                    return Err(rejected(TimerError::unstopped(key, None)));
                }
                intervals.push(Interval::open(self.clock.now()));
            }
        }

        trace!(key = %key, "timer started");
        Ok(self)
    }

    /// Start the interval identified by `id` under `key`
    pub fn start_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        match self.timers.get_mut(key) {
            None => {
                let mut ids = IndexMap::new();
                ids.insert(id.to_string(), Interval::open(self.clock.now()));
                self.timers.insert(key.to_string(), TimerEntry::Keyed(ids));
            }
            Some(TimerEntry::Sequential(_)) => {
                return Err(rejected(TimerError::mode_conflict(
                    key,
                    Some(id),
                    AddressingMode::Sequential,
                    AddressingMode::Keyed,
                )));
            }
            Some(TimerEntry::Keyed(ids)) => match ids.get(id) {
                Some(interval) if interval.is_open() => {
                    return Err(rejected(TimerError::unstopped(key, Some(id))));
                }
                Some(_) => return Err(rejected(TimerError::duplicate_id(key, id))),
                None => {
                    ids.insert(id.to_string(), Interval::open(self.clock.now()));
                }
            },
        }

        trace!(key = %key, id = %id, "timer started");
        Ok(self)
    }

    /// Stop the running sequential interval for `key`
    pub fn stop(&mut self, key: &str) -> TimerResult<&mut Self> {
        let now = self.clock.now();
        let interval = match self.timers.get_mut(key) {
            Some(TimerEntry::Sequential(intervals)) => intervals.last_mut(),
            _ => None,
        };

        let delta = match interval {
            Some(interval) if interval.is_open() => interval.close(now),
            _ => return Err(rejected(TimerError::not_started(key, None))),
        };

        trace!(key = %key, elapsed_ms = delta.as_millis() as u64, "timer stopped");
        Ok(self)
    }

    /// Stop the running interval identified by `id` under `key`
    pub fn stop_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        let now = self.clock.now();
        let interval = match self.timers.get_mut(key) {
            Some(TimerEntry::Keyed(ids)) => ids.get_mut(id),
            _ => None,
        };

        let delta = match interval {
            Some(interval) if interval.is_open() => interval.close(now),
            _ => return Err(rejected(TimerError::not_started(key, Some(id)))),
        };

        trace!(key = %key, id = %id, elapsed_ms = delta.as_millis() as u64, "timer stopped");
        Ok(self)
    }

    /// Send the report to the configured sink
    pub fn log(&mut self) -> &mut Self {
        let report = self.report();
        self.sink.emit(&report);
        self
    }

    /// Render every key in first-start order
    ///
    /// Reading the registry never changes it, so repeated calls return the
    /// same text until the next `start`/`stop`.
    pub fn report(&self) -> String {
        report::render(&self.summaries(), &self.header, &self.empty_message)
    }

    /// Same text as [`TimerRegistry::report`]
    pub fn inspect(&self) -> String {
        self.report()
    }

    /// Aggregated statistics per key, in first-start order
    pub fn summaries(&self) -> Vec<TimerSummary> {
        self.timers
            .iter()
            .map(|(key, entry)| match entry {
                TimerEntry::Sequential(intervals) => {
                    TimerSummary::from_intervals(key, AddressingMode::Sequential, intervals)
                }
                TimerEntry::Keyed(ids) => {
                    TimerSummary::from_intervals(key, AddressingMode::Keyed, ids.values())
                }
            })
            .collect()
    }

    /// Export the summaries as pretty printed JSON
    pub fn export_json(&self) -> TimerResult<String> {
        let report = TimerReport::new(self.summaries());
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Number of keys started so far
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Keys in first-start order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.timers.keys().map(String::as_str)
    }

    pub fn entry(&self, key: &str) -> Option<&TimerEntry> {
        self.timers.get(key)
    }

    pub fn mode(&self, key: &str) -> Option<AddressingMode> {
        self.timers.get(key).map(TimerEntry::mode)
    }

    /// Sequential intervals of `key`; `None` for unknown or keyed keys
    pub fn intervals(&self, key: &str) -> Option<&[Interval]> {
        match self.timers.get(key)? {
            TimerEntry::Sequential(intervals) => Some(intervals),
            TimerEntry::Keyed(_) => None,
        }
    }

    pub fn interval_id(&self, key: &str, id: &str) -> Option<&Interval> {
        match self.timers.get(key)? {
            TimerEntry::Keyed(ids) => ids.get(id),
            TimerEntry::Sequential(_) => None,
        }
    }

    /// Whether the latest sequential interval of `key` is running
    pub fn is_running(&self, key: &str) -> bool {
        self.intervals(key).and_then(<[Interval]>::last).is_some_and(Interval::is_open)
    }

    pub fn is_running_id(&self, key: &str, id: &str) -> bool {
        self.interval_id(key, id).is_some_and(Interval::is_open)
    }

    /// Duration of the latest sequential interval, running or not
    pub fn elapsed(&self, key: &str) -> Option<Duration> {
        let interval = self.intervals(key)?.last()?;
        Some(interval.elapsed_at(self.clock.now()))
    }

    pub fn elapsed_id(&self, key: &str, id: &str) -> Option<Duration> {
        let interval = self.interval_id(key, id)?;
        Some(interval.elapsed_at(self.clock.now()))
    }

    /// Drop all recorded data and become a no-op timer
    pub fn into_stub(self) -> StubTimer {
        debug!(timers = self.timers.len(), "Discarding recorded timers for stub");
        StubTimer
    }
}

fn rejected(err: TimerError) -> TimerError {
    debug!(
        kind = err.kind(),
        key = err.key().unwrap_or_default(),
        id = err.id().unwrap_or_default(),
        "Rejected timer call: {err}"
    );
    err
}

impl<C: Clock> fmt::Display for TimerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

impl<C: Clock> fmt::Debug for TimerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}
