//! Timer and report settings
//!
//! Every field has a serde default, so a partial TOML document such as
//! `sink = "tracing"` is a complete configuration.

use crate::error::{TimerError, TimerResult};
use crate::sink::SinkKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_HEADER: &str = "TIMER RESULTS:";
pub const DEFAULT_EMPTY_MESSAGE: &str = "NO TIMERS TO OUTPUT";

/// Settings for constructing timers and rendering their report
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// `false` makes `create_timer_with` hand out a stub
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// First line of a non-empty report
    #[serde(default = "default_header")]
    pub header: String,
    /// Whole report when nothing has been recorded
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
    /// Where `log()` sends the report
    #[serde(default)]
    pub sink: SinkKind,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header: default_header(),
            empty_message: default_empty_message(),
            sink: SinkKind::default(),
        }
    }
}

impl TimerConfig {
    /// Configuration for disabled instrumentation
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Parse and validate a TOML document; missing fields take their defaults
    pub fn from_toml_str(source: &str) -> TimerResult<Self> {
        let config: TimerConfig = toml::from_str(source)?;
        config.validate()?;
        debug!(
            enabled = config.enabled,
            sink = ?config.sink,
            "Loaded timer configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> TimerResult<()> {
        if self.header.contains('\n') {
            return Err(TimerError::configuration(
                Some("header"),
                "header must be a single line",
            ));
        }
        if self.empty_message.is_empty() {
            return Err(TimerError::configuration(
                Some("empty_message"),
                "empty_message must not be empty",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}
fn default_empty_message() -> String {
    DEFAULT_EMPTY_MESSAGE.to_string()
}
