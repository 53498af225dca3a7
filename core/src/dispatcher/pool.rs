//! Dispatcher execution logic

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};

use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::metrics::RunStatistics;
use crate::request::RequestSource;
use crate::traits::{Executor, ProgressSink};
use crate::worker::{SharedQueue, WorkerBuilder, WorkerStats};

use super::aggregator::Aggregator;

/// Statistics of a run together with what each worker did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Finalized run statistics
    pub statistics: RunStatistics,

    /// Per-worker bookkeeping, ordered by worker id
    pub workers: Vec<WorkerStats>,
}

impl RunReport {
    /// Counters summed over every worker
    pub fn totals(&self) -> WorkerStats {
        self.workers
            .iter()
            .fold(WorkerStats::default(), |mut acc, worker| {
                acc.merge(worker);
                acc
            })
    }
}

/// Dispatcher owns the fan-out/fan-in of one load run
///
/// A bounded queue feeds a fixed pool of workers. The caller's task is the
/// producer: it enqueues every request once, in source order, then closes
/// the queue. Workers exit once the queue is closed and drained, after which
/// the aggregator is finalized.
pub struct Dispatcher {
    /// Run configuration
    pub(crate) config: RunConfig,

    /// Executor (shared across workers)
    pub(crate) executor: Arc<dyn Executor>,

    /// Progress sink (shared across workers)
    pub(crate) progress: Arc<dyn ProgressSink>,
}

impl Dispatcher {
    /// Create a new dispatcher
    ///
    /// Use `DispatcherBuilder` for a more ergonomic construction.
    pub fn new(
        config: RunConfig,
        executor: Arc<dyn Executor>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            config,
            executor,
            progress,
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every request to completion and return the finalized statistics
    pub async fn run(&self, requests: RequestSource) -> BenchResult<RunStatistics> {
        self.run_detailed(requests)
            .await
            .map(|report| report.statistics)
    }

    /// Like [`run`](Self::run), also returning per-worker stats
    ///
    /// # Errors
    ///
    /// - [`BenchError::Config`] if the configuration is invalid
    /// - [`BenchError::EmptyRun`] if `requests` is empty
    /// - [`BenchError::Worker`] if a worker task panicked
    ///
    /// Errors are returned before any request is sent, except for worker
    /// panics. Failed calls are never errors; they end up in the statistics.
    pub async fn run_detailed(&self, requests: RequestSource) -> BenchResult<RunReport> {
        self.config
            .validate()
            .map_err(|e| BenchError::config(e.to_string()))?;

        if requests.is_empty() {
            return Err(BenchError::EmptyRun);
        }

        let start = Instant::now();
        let total = requests.len();
        let workers = self.config.workers;
        let channel = self.config.channel_config();

        tracing::info!(
            requests = total,
            workers,
            queue_buffer = channel.queue_buffer,
            executor = self.executor.name(),
            "Starting load run"
        );

        let (tx, rx) = mpsc::channel(channel.queue_buffer);
        let queue: SharedQueue = Arc::new(Mutex::new(rx));
        let aggregator = Arc::new(Aggregator::with_capacity(total));

        // Spawn worker tasks
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let worker = WorkerBuilder::new(worker_id)
                .executor(Arc::clone(&self.executor))
                .queue(Arc::clone(&queue))
                .aggregator(Arc::clone(&aggregator))
                .progress(Arc::clone(&self.progress))
                .timeout(self.config.timeout)
                .build()?;

            handles.push(tokio::spawn(worker.run()));
        }
        drop(queue);

        // Produce in source order, then close the queue
        for request in requests {
            if tx.send(request).await.is_err() {
                tracing::error!("Request queue closed before all requests were enqueued");
                break;
            }
        }
        drop(tx);

        // Wait for all workers to drain the queue
        let mut results = Vec::with_capacity(handles.len());
        let mut worker_failures = 0;
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => {
                    tracing::debug!(
                        worker_id = idx,
                        processed = stats.processed,
                        failures = stats.failures,
                        "Worker completed"
                    );
                    results.push(stats);
                }
                Err(e) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        self.progress.finish();

        if worker_failures > 0 {
            return Err(BenchError::worker(format!(
                "{worker_failures} of {workers} workers failed to complete"
            )));
        }

        let aggregator = Arc::try_unwrap(aggregator).map_err(|_| {
            BenchError::worker("aggregator still shared after all workers exited")
        })?;
        let statistics = aggregator.finalize()?;

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            total_requests = statistics.total_requests(),
            failures = statistics.failure_count(),
            average_response_time = statistics.average_response_time(),
            "Load run completed"
        );

        Ok(RunReport {
            statistics,
            workers: results,
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("executor", &self.executor.name())
            .finish()
    }
}
