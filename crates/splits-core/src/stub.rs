//! No-op timer
//!
//! [`StubTimer`] accepts every call a [`crate::TimerRegistry`] accepts, records
//! nothing and never fails, so instrumentation can be switched off without
//! touching call sites.

use crate::error::TimerResult;
use std::fmt;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct StubTimer;

impl StubTimer {
    pub fn new() -> Self {
        StubTimer
    }

    pub fn start(&mut self, _key: &str) -> TimerResult<&mut Self> {
        Ok(self)
    }

    pub fn start_id(&mut self, _key: &str, _id: &str) -> TimerResult<&mut Self> {
        Ok(self)
    }

    pub fn stop(&mut self, _key: &str) -> TimerResult<&mut Self> {
        Ok(self)
    }

    pub fn stop_id(&mut self, _key: &str, _id: &str) -> TimerResult<&mut Self> {
        Ok(self)
    }

    pub fn log(&mut self) -> &mut Self {
        self
    }

    pub fn report(&self) -> String {
        String::new()
    }

    pub fn inspect(&self) -> String {
        String::new()
    }
}

impl fmt::Display for StubTimer {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl fmt::Debug for StubTimer {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}
