//! Worker statistics tracking

use std::time::Instant;

/// Statistics tracked by each worker
///
/// These are bookkeeping for logs and tests. The run's own numbers live in
/// the shared aggregator.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Worker identifier
    pub worker_id: usize,

    /// Number of requests this worker pulled and executed
    pub processed: usize,

    /// Number of those requests that counted as failures
    pub failures: usize,

    /// Number of failures where no response was received
    pub transport_errors: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats for `worker_id`
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Record one executed request
    pub fn record(&mut self, failed: bool, transport_error: bool) {
        self.processed += 1;
        if failed {
            self.failures += 1;
        }
        if transport_error {
            self.transport_errors += 1;
        }
    }

    /// Whether the worker exited without executing anything
    pub fn is_idle(&self) -> bool {
        self.processed == 0
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.processed += other.processed;
        self.failures += other.failures;
        self.transport_errors += other.transport_errors;
    }
}
