//! Worker execution loop

use crate::dispatcher::Aggregator;
use crate::request::Request;
use crate::response::{CallOutcome, CallResult};
use crate::traits::{Executor, ProgressSink};

use super::stats::WorkerStats;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Request queue shared by every worker of a run
///
/// `mpsc` has a single consumer, so workers take turns holding the receiver
/// while they wait for the next item. The guard is dropped before the
/// request is executed.
pub type SharedQueue = Arc<Mutex<mpsc::Receiver<Request>>>;

/// Worker pulls requests in a loop: pull -> execute -> record -> signal
///
/// Workers are tokio tasks spawned by the Dispatcher. They never talk to
/// each other; the aggregator is the only state they share.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Executor (shared across workers via Arc)
    executor: Arc<dyn Executor>,

    /// Request queue (shared across workers)
    queue: SharedQueue,

    /// Result accumulator (shared across workers)
    aggregator: Arc<Aggregator>,

    /// Progress sink (shared across workers)
    progress: Arc<dyn ProgressSink>,

    /// Upper bound on a single call
    timeout: Duration,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        executor: Arc<dyn Executor>,
        queue: SharedQueue,
        aggregator: Arc<Aggregator>,
        progress: Arc<dyn ProgressSink>,
        timeout: Duration,
    ) -> Self {
        Self {
            id,
            executor,
            queue,
            aggregator,
            progress,
            timeout,
        }
    }

    /// Run the worker loop until the queue is closed and drained
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::new(self.id);
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        while let Some(request) = self.next_request().await {
            let result = self.execute(&request).await;

            let transport_error = match &result.outcome {
                CallOutcome::TransportError { message } => {
                    tracing::warn!(
                        worker_id = self.id,
                        request_id = %request.id,
                        url = %request.url,
                        error = %message,
                        "Request failed"
                    );
                    true
                }
                CallOutcome::Success { status, .. } => {
                    tracing::trace!(
                        worker_id = self.id,
                        request_id = %request.id,
                        status = *status,
                        elapsed_ms = result.duration.as_millis() as u64,
                        "Request completed"
                    );
                    false
                }
            };

            let failed = self.aggregator.record(result);
            stats.record(failed, transport_error);
            self.progress.increment();
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            processed = stats.processed,
            failures = stats.failures,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Execute one request, turning an overrun into a transport error
    async fn execute(&self, request: &Request) -> CallResult {
        match tokio::time::timeout(self.timeout, self.executor.execute(request)).await {
            Ok(result) => result,
            Err(_) => CallResult::transport_error(
                &request.url,
                self.timeout,
                format!("request timed out after {:?}", self.timeout),
            ),
        }
    }

    /// Wait for the next request; `None` once the queue is closed and empty
    async fn next_request(&self) -> Option<Request> {
        let mut queue = self.queue.lock().await;
        queue.recv().await
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("executor", &self.executor.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
