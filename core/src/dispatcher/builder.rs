//! Builder pattern for Dispatcher construction

use std::sync::Arc;
use std::time::Duration;

use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::traits::{Executor, NoopProgress, ProgressSink};

use super::pool::Dispatcher;

/// Builder for creating a Dispatcher with proper configuration
///
/// # Example
///
/// ```ignore
/// let dispatcher = DispatcherBuilder::new()
///     .workers(10)
///     .timeout(Duration::from_secs(5))
///     .executor(executor)
///     .progress(progress)
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    config: RunConfig,
    executor: Option<Arc<dyn Executor>>,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl DispatcherBuilder {
    /// Create a new dispatcher builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            executor: None,
            progress: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the per-call timeout
    ///
    /// Every worker cancels a call that runs longer and records it as a
    /// transport error, whatever timeout the executor itself applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set an explicit request queue capacity
    pub fn queue_buffer(mut self, size: usize) -> Self {
        self.config.queue_buffer = Some(size);
        self
    }

    /// Set the executor
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the progress sink (defaults to [`NoopProgress`])
    pub fn progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Build the dispatcher
    ///
    /// # Errors
    ///
    /// Returns an error if the executor is not set, or if configuration
    /// validation fails.
    pub fn build(self) -> BenchResult<Dispatcher> {
        let executor = self
            .executor
            .ok_or_else(|| BenchError::missing_config("executor"))?;

        self.config
            .validate()
            .map_err(|e| BenchError::config(e.to_string()))?;

        let progress = self
            .progress
            .unwrap_or_else(|| Arc::new(NoopProgress));

        Ok(Dispatcher::new(self.config, executor, progress))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
