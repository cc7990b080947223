//! Live/stub switching
//!
//! [`Instrument`] is the contract shared by [`TimerRegistry`] and
//! [`StubTimer`]. [`Timer`] holds either one and can be turned into a stub in
//! place, which is how an already constructed timer gets disabled.

use crate::config::TimerConfig;
use crate::error::TimerResult;
use crate::interval::{Clock, MonotonicClock};
use crate::registry::TimerRegistry;
use crate::stub::StubTimer;
use std::fmt;
use tracing::debug;

/// Operations every timer supports
pub trait Instrument {
    fn start(&mut self, key: &str) -> TimerResult<&mut Self>;

    fn start_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self>;

    fn stop(&mut self, key: &str) -> TimerResult<&mut Self>;

    fn stop_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self>;

    /// Send the report to the timer's sink
    fn log(&mut self) -> &mut Self;

    fn report(&self) -> String;

    fn is_stub(&self) -> bool;

    /// Time a closure as one sequential interval of `key`
    fn time<T, F>(&mut self, key: &str, f: F) -> TimerResult<T>
    where
        F: FnOnce() -> T,
    {
        self.start(key)?;
        let result = f();
        self.stop(key)?;
        Ok(result)
    }

    /// Time a closure as the interval `id` of `key`
    fn time_id<T, F>(&mut self, key: &str, id: &str, f: F) -> TimerResult<T>
    where
        F: FnOnce() -> T,
    {
        self.start_id(key, id)?;
        let result = f();
        self.stop_id(key, id)?;
        Ok(result)
    }
}

impl<C: Clock> Instrument for TimerRegistry<C> {
    fn start(&mut self, key: &str) -> TimerResult<&mut Self> {
        TimerRegistry::start(self, key)
    }

    fn start_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        TimerRegistry::start_id(self, key, id)
    }

    fn stop(&mut self, key: &str) -> TimerResult<&mut Self> {
        TimerRegistry::stop(self, key)
    }

    fn stop_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        TimerRegistry::stop_id(self, key, id)
    }

    fn log(&mut self) -> &mut Self {
        TimerRegistry::log(self)
    }

    fn report(&self) -> String {
        TimerRegistry::report(self)
    }

    fn is_stub(&self) -> bool {
        false
    }
}

impl Instrument for StubTimer {
    fn start(&mut self, key: &str) -> TimerResult<&mut Self> {
        StubTimer::start(self, key)
    }

    fn start_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        StubTimer::start_id(self, key, id)
    }

    fn stop(&mut self, key: &str) -> TimerResult<&mut Self> {
        StubTimer::stop(self, key)
    }

    fn stop_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        StubTimer::stop_id(self, key, id)
    }

    fn log(&mut self) -> &mut Self {
        StubTimer::log(self)
    }

    fn report(&self) -> String {
        StubTimer::report(self)
    }

    fn is_stub(&self) -> bool {
        true
    }
}

/// A timer that is either recording or stubbed out
pub enum Timer<C: Clock = MonotonicClock> {
    Live(TimerRegistry<C>),
    Stub(StubTimer),
}

impl Timer {
    /// Fresh live timer; every call returns independent state
    pub fn new() -> Self {
        Timer::Live(TimerRegistry::new())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Timer<C> {
    /// Replace this timer with a stub
    ///
    /// Anything recorded so far is dropped: the report is empty from here on
    /// and every later call succeeds without effect.
    pub fn stub(&mut self) -> &mut Self {
        if let Timer::Live(registry) = self {
            debug!(timers = registry.len(), "Converting timer to stub");
            *self = Timer::Stub(StubTimer);
        }
        self
    }

    /// The live registry, unless this timer is a stub
    pub fn registry(&self) -> Option<&TimerRegistry<C>> {
        match self {
            Timer::Live(registry) => Some(registry),
            Timer::Stub(_) => None,
        }
    }

    pub fn registry_mut(&mut self) -> Option<&mut TimerRegistry<C>> {
        match self {
            Timer::Live(registry) => Some(registry),
            Timer::Stub(_) => None,
        }
    }

    pub fn inspect(&self) -> String {
        Instrument::report(self)
    }
}

impl<C: Clock> Instrument for Timer<C> {
    fn start(&mut self, key: &str) -> TimerResult<&mut Self> {
        if let Timer::Live(registry) = self {
            registry.start(key)?;
        }
        Ok(self)
    }

    fn start_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        if let Timer::Live(registry) = self {
            registry.start_id(key, id)?;
        }
        Ok(self)
    }

    fn stop(&mut self, key: &str) -> TimerResult<&mut Self> {
        if let Timer::Live(registry) = self {
            registry.stop(key)?;
        }
        Ok(self)
    }

    fn stop_id(&mut self, key: &str, id: &str) -> TimerResult<&mut Self> {
        if let Timer::Live(registry) = self {
            registry.stop_id(key, id)?;
        }
        Ok(self)
    }

    fn log(&mut self) -> &mut Self {
        if let Timer::Live(registry) = self {
            registry.log();
        }
        self
    }

    fn report(&self) -> String {
        match self {
            Timer::Live(registry) => registry.report(),
            Timer::Stub(stub) => stub.report(),
        }
    }

    fn is_stub(&self) -> bool {
        matches!(self, Timer::Stub(_))
    }
}

impl<C: Clock> From<TimerRegistry<C>> for Timer<C> {
    fn from(registry: TimerRegistry<C>) -> Self {
        Timer::Live(registry)
    }
}

impl<C: Clock> From<StubTimer> for Timer<C> {
    fn from(stub: StubTimer) -> Self {
        Timer::Stub(stub)
    }
}

impl<C: Clock> fmt::Display for Timer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Instrument::report(self))
    }
}

impl<C: Clock> fmt::Debug for Timer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Instrument::report(self))
    }
}

/// Create a fresh live timer
pub fn create_timer() -> Timer {
    Timer::new()
}

/// Create a timer that ignores every call
pub fn create_stub() -> Timer {
    Timer::Stub(StubTimer)
}

/// Create a live timer from `config`, or a stub when it is disabled
pub fn create_timer_with(config: &TimerConfig) -> Timer {
    if config.enabled {
        Timer::Live(TimerRegistry::with_config(config))
    } else {
        debug!("Timer disabled by configuration; using stub");
        create_stub()
    }
}
