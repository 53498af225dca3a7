//! Builder pattern for Worker construction

use crate::config::DEFAULT_TIMEOUT;
use crate::dispatcher::Aggregator;
use crate::error::{BenchError, BenchResult};
use crate::traits::{Executor, NoopProgress, ProgressSink};

use super::task::{SharedQueue, Worker};

use std::sync::Arc;
use std::time::Duration;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .executor(executor)
///     .queue(queue)
///     .aggregator(aggregator)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    executor: Option<Arc<dyn Executor>>,
    queue: Option<SharedQueue>,
    aggregator: Option<Arc<Aggregator>>,
    progress: Option<Arc<dyn ProgressSink>>,
    timeout: Duration,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            executor: None,
            queue: None,
            aggregator: None,
            progress: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the executor
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the shared request queue
    pub fn queue(mut self, queue: SharedQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared aggregator
    pub fn aggregator(mut self, aggregator: Arc<Aggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Set the progress sink (defaults to [`NoopProgress`])
    pub fn progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the per-call timeout (defaults to [`DEFAULT_TIMEOUT`])
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> BenchResult<Worker> {
        let executor = self
            .executor
            .ok_or_else(|| BenchError::missing_config("executor"))?;
        let queue = self
            .queue
            .ok_or_else(|| BenchError::missing_config("queue"))?;
        let aggregator = self
            .aggregator
            .ok_or_else(|| BenchError::missing_config("aggregator"))?;
        let progress = self
            .progress
            .unwrap_or_else(|| Arc::new(NoopProgress));

        Ok(Worker::new(
            self.id,
            executor,
            queue,
            aggregator,
            progress,
            self.timeout,
        ))
    }
}
