//! Error types for the telemetry engine.

use thiserror::Error;

/// The main error type for engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine is already running.
    #[error("engine is already running")]
    AlreadyRunning,

    /// No telemetry sources were supplied to start.
    #[error("no telemetry sources to start")]
    NoSources,

    /// A source failed while producing readings.
    #[error("source '{name}' failed: {message}")]
    SourceFailed {
        /// Name of the source.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// The reading channel closed before the engine was stopped.
    #[error("reading channel closed")]
    ChannelClosed,

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a source failure error.
    #[must_use]
    pub fn source_failed(name: &'static str, message: impl Into<String>) -> Self {
        Self::SourceFailed {
            name,
            message: message.into(),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the engine was already running.
    #[must_use]
    pub fn is_already_running(&self) -> bool {
        matches!(self, Self::AlreadyRunning)
    }
}
