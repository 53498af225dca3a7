//! Error types for loadstats-core

use thiserror::Error;

/// Core error type
///
/// Only configuration problems and broken workers ever surface here.
/// Per-request failures are recorded as data in the run statistics.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration error (invalid worker count, missing collaborator, ...)
    #[error("configuration error: {0}")]
    Config(String),

    /// The run produced no response times, so no average exists
    #[error("no requests were processed; average response time is undefined")]
    EmptyRun,

    /// A worker task died before draining the queue
    #[error("worker error: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Configuration error with a message
    pub fn config(message: impl Into<String>) -> Self {
        BenchError::Config(message.into())
    }

    /// Required builder field was never set
    pub fn missing_config(field: &str) -> Self {
        BenchError::Config(format!("missing required field: {field}"))
    }

    /// Worker failure with a message
    pub fn worker(message: impl Into<String>) -> Self {
        BenchError::Worker(message.into())
    }

    /// Whether this error is a configuration problem (as opposed to a runtime fault)
    pub fn is_config(&self) -> bool {
        matches!(self, BenchError::Config(_) | BenchError::EmptyRun)
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
