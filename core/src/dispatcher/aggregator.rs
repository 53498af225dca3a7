//! Synchronized accumulation of call results

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::{BenchError, BenchResult};
use crate::metrics::{is_failure_status, FailureRecord, RunStatistics};
use crate::response::{CallOutcome, CallResult};

/// Thread-safe accumulator of per-call results
///
/// Workers share one `Aggregator` and call [`record`](Self::record) after
/// every request. The lock is held only for the append itself, never across
/// a network call. [`finalize`](Self::finalize) consumes the aggregator, so
/// statistics can be computed once and only after every worker has let go
/// of its handle.
#[derive(Debug)]
pub struct Aggregator {
    state: Mutex<AggregatorState>,
    started_at: chrono::DateTime<chrono::Utc>,
    started: Instant,
}

#[derive(Debug, Default)]
struct AggregatorState {
    response_times: Vec<f64>,
    failure_log: Vec<FailureRecord>,
}

impl Aggregator {
    /// Create an empty aggregator; the run clock starts now
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty aggregator with room for `capacity` results
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(AggregatorState {
                response_times: Vec::with_capacity(capacity),
                failure_log: Vec::new(),
            }),
            started_at: chrono::Utc::now(),
            started: Instant::now(),
        }
    }

    /// Merge one call result
    ///
    /// Returns `true` if the call counted as a failure.
    pub fn record(&self, result: CallResult) -> bool {
        let duration = result.duration_secs();
        let failure = match result.outcome {
            CallOutcome::Success { status, body } if is_failure_status(status) => {
                Some(FailureRecord {
                    status_code: Some(status),
                    url: result.url,
                    response_body: body,
                })
            }
            CallOutcome::Success { .. } => None,
            CallOutcome::TransportError { message } => Some(FailureRecord {
                status_code: None,
                url: result.url,
                response_body: message,
            }),
        };
        let failed = failure.is_some();

        let mut state = self.lock();
        state.response_times.push(duration);
        if let Some(record) = failure {
            state.failure_log.push(record);
        }

        failed
    }

    /// Number of results recorded so far
    pub fn recorded(&self) -> usize {
        self.lock().response_times.len()
    }

    /// Number of failures recorded so far
    pub fn failure_count(&self) -> usize {
        self.lock().failure_log.len()
    }

    /// Compute the average and freeze the statistics
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::EmptyRun`] if nothing was recorded, instead of
    /// producing a NaN average.
    pub fn finalize(self) -> BenchResult<RunStatistics> {
        let total_duration = self.started.elapsed();
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        if state.response_times.is_empty() {
            return Err(BenchError::EmptyRun);
        }

        let sum: f64 = state.response_times.iter().sum();
        let average = sum / state.response_times.len() as f64;

        Ok(RunStatistics::new(
            state.response_times,
            state.failure_log,
            average,
            self.started_at,
            total_duration,
        ))
    }

    // Every record is a complete push, so a panic elsewhere never leaves the
    // state half-written.
    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
