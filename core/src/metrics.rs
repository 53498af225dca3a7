//! Run-level statistics

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status codes at or above this value count as failures
///
/// 300 itself is a failure: redirects that reach the aggregator were not
/// followed by the transport and are treated like any other non-2xx reply.
pub const FAILURE_STATUS_THRESHOLD: u16 = 300;

/// Whether a received status code counts as a failed call
pub fn is_failure_status(status: u16) -> bool {
    status >= FAILURE_STATUS_THRESHOLD
}

/// Details of one failed call, kept for post-run inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// HTTP status code, or `None` when no response was received
    pub status_code: Option<u16>,

    /// URL of the failed request
    pub url: String,

    /// Response body, or the transport error message when there was no response
    pub response_body: String,
}

impl FailureRecord {
    /// Whether this failure is a transport error rather than an HTTP status
    pub fn is_transport_error(&self) -> bool {
        self.status_code.is_none()
    }
}

/// Finalized statistics of one run
///
/// `response_times` and `failure_log` are in completion order, which depends
/// on network latency and scheduling. Two runs over the same requests will
/// generally list them in different orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    response_times: Vec<f64>,
    failure_count: usize,
    failure_log: Vec<FailureRecord>,
    average_response_time: f64,
    started_at: chrono::DateTime<chrono::Utc>,
    total_duration_secs: f64,
}

impl RunStatistics {
    pub(crate) fn new(
        response_times: Vec<f64>,
        failure_log: Vec<FailureRecord>,
        average_response_time: f64,
        started_at: chrono::DateTime<chrono::Utc>,
        total_duration: Duration,
    ) -> Self {
        Self {
            response_times,
            failure_count: failure_log.len(),
            failure_log,
            average_response_time,
            started_at,
            total_duration_secs: total_duration.as_secs_f64(),
        }
    }

    /// Per-call durations in seconds, in completion order
    pub fn response_times(&self) -> &[f64] {
        &self.response_times
    }

    /// Number of calls that failed (status >= 300 or transport error)
    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Failure details, in completion order
    pub fn failure_log(&self) -> &[FailureRecord] {
        &self.failure_log
    }

    /// Arithmetic mean of `response_times`, in seconds
    pub fn average_response_time(&self) -> f64 {
        self.average_response_time
    }

    /// Number of calls processed
    pub fn total_requests(&self) -> usize {
        self.response_times.len()
    }

    /// Number of calls that did not fail
    pub fn success_count(&self) -> usize {
        self.total_requests() - self.failure_count
    }

    /// When the aggregator was created
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Wall-clock time from aggregator creation to finalization
    pub fn total_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_duration_secs)
    }
}
