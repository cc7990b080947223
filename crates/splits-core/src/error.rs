//! Error handling for timer operations
//!
//! Every state machine violation is a misuse error: it points at a bug in the
//! instrumented code, is raised at the offending call and leaves the registry
//! untouched. The remaining variants cover configuration parsing and report
//! export.

use crate::registry::AddressingMode;
use thiserror::Error;

/// Error type for timer registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A key was used in the other addressing mode than the one it was created with
    #[error(
        "timer [{key}]{} was initialised in {established} mode then called in {attempted} mode",
        display_id(.id)
    )]
    ModeConflict {
        key: String,
        id: Option<String>,
        established: AddressingMode,
        attempted: AddressingMode,
    },

    /// A timer was started again while its previous interval is still running
    #[error("timer [{key}]{} started again without being stopped", display_id(.id))]
    UnstoppedTimer { key: String, id: Option<String> },

    /// A keyed timer was started again after it had already been stopped
    #[error("timer [{key}], id [{id}] started more than once")]
    DuplicateId { key: String, id: String },

    /// A timer was stopped without a running interval to close
    #[error("timer [{key}]{} stopped without being started", display_id(.id))]
    NotStarted { key: String, id: Option<String> },

    /// Configuration could not be parsed or holds an unusable value
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },

    /// Report export failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

fn display_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(", id [{id}]"),
        None => String::new(),
    }
}

/// Result type alias for timer operations
pub type TimerResult<T> = Result<T, TimerError>;

impl TimerError {
    /// Get the error category for logging
    pub fn kind(&self) -> &'static str {
        match self {
            TimerError::ModeConflict { .. } => "mode_conflict",
            TimerError::UnstoppedTimer { .. } => "unstopped_timer",
            TimerError::DuplicateId { .. } => "duplicate_id",
            TimerError::NotStarted { .. } => "not_started",
            TimerError::Configuration { .. } => "configuration",
            TimerError::Serialization { .. } => "serialization",
        }
    }

    /// True for start/stop violations raised by the registry state machine
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            TimerError::ModeConflict { .. }
                | TimerError::UnstoppedTimer { .. }
                | TimerError::DuplicateId { .. }
                | TimerError::NotStarted { .. }
        )
    }

    /// The timer key the error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            TimerError::ModeConflict { key, .. }
            | TimerError::UnstoppedTimer { key, .. }
            | TimerError::DuplicateId { key, .. }
            | TimerError::NotStarted { key, .. } => Some(key),
            TimerError::Configuration { .. } | TimerError::Serialization { .. } => None,
        }
    }

    /// The timer id the error refers to, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            TimerError::ModeConflict { id, .. }
            | TimerError::UnstoppedTimer { id, .. }
            | TimerError::NotStarted { id, .. } => id.as_deref(),
            TimerError::DuplicateId { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Convenience constructors for the registry's failure scenarios
impl TimerError {
    pub fn mode_conflict(
        key: &str,
        id: Option<&str>,
        established: AddressingMode,
        attempted: AddressingMode,
    ) -> Self {
        Self::ModeConflict { key: key.to_string(), id: id.map(str::to_string), established, attempted }
    }

    pub fn unstopped(key: &str, id: Option<&str>) -> Self {
        Self::UnstoppedTimer { key: key.to_string(), id: id.map(str::to_string) }
    }

    pub fn duplicate_id(key: &str, id: &str) -> Self {
        Self::DuplicateId { key: key.to_string(), id: id.to_string() }
    }

    pub fn not_started(key: &str, id: Option<&str>) -> Self {
        Self::NotStarted { key: key.to_string(), id: id.map(str::to_string) }
    }

    /// Create a configuration error
    pub fn configuration(setting: Option<&str>, message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), setting: setting.map(str::to_string) }
    }
}

impl From<serde_json::Error> for TimerError {
    fn from(err: serde_json::Error) -> Self {
        TimerError::Serialization { message: format!("JSON error: {err}") }
    }
}

impl From<toml::de::Error> for TimerError {
    fn from(err: toml::de::Error) -> Self {
        TimerError::configuration(None, format!("invalid TOML: {}", err.message()))
    }
}
