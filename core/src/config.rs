//! Run configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::channel::ChannelConfig;

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest per-call timeout a run accepts
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Run configuration
///
/// Defines how a load run is dispatched: how many workers pull from the
/// queue, how far the producer may run ahead of them, and how long a single
/// call may take before the executor gives up on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Per-call timeout, enforced by every worker around each call
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,

    /// Request queue capacity; defaults to twice the worker count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_buffer: Option<usize>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            timeout: DEFAULT_TIMEOUT,
            queue_buffer: None,
        }
    }
}

impl RunConfig {
    /// Create a new config with the given worker count
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an explicit queue capacity
    pub fn with_queue_buffer(mut self, size: usize) -> Self {
        self.queue_buffer = Some(size);
        self
    }

    /// Effective queue capacity for this run
    pub fn channel_config(&self) -> ChannelConfig {
        match self.queue_buffer {
            Some(size) => ChannelConfig::default().with_queue_buffer(size),
            None => ChannelConfig::for_workers(self.workers),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers(
                "worker count must be at least 1".into(),
            ));
        }

        if self.queue_buffer == Some(0) {
            return Err(ConfigError::InvalidQueueBuffer(
                "queue buffer must be at least 1".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "timeout must be greater than zero".into(),
            ));
        }

        if self.timeout > MAX_TIMEOUT {
            return Err(ConfigError::InvalidTimeout(format!(
                "timeout of {:?} exceeds the {:?} limit",
                self.timeout, MAX_TIMEOUT
            )));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    /// Invalid queue capacity
    #[error("Invalid queue buffer: {0}")]
    InvalidQueueBuffer(String),

    /// Invalid timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
