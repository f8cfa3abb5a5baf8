//! Error types for the logged crate
//!
//! Logging calls never return errors. These are surfaced only by parsing,
//! configuration and handler shutdown.

pub type Result<T> = std::result::Result<T, LoggedError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggedError {
    /// Unrecognised level name
    #[error("log: invalid log level: {0}")]
    InvalidLevel(String),

    /// Unrecognised format name
    #[error("log: invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background flush worker died before it could be joined
    #[error("flush worker panicked")]
    WorkerPanicked,
}

impl LoggedError {
    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggedError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggedError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
