//! Per-call results produced by executors

use std::time::Duration;

/// How a single call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// A response was received, whatever its status code
    Success {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },
    /// No response was received (connection refused, timeout, ...)
    TransportError {
        /// Error description reported by the transport
        message: String,
    },
}

impl CallOutcome {
    /// Status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            CallOutcome::Success { status, .. } => Some(*status),
            CallOutcome::TransportError { .. } => None,
        }
    }

    /// Whether the transport failed before a response arrived
    pub fn is_transport_error(&self) -> bool {
        matches!(self, CallOutcome::TransportError { .. })
    }
}

/// Result of executing one request
///
/// Owned by the worker that produced it until it is handed to the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    /// Wall-clock time bracketing the call, including time to failure
    pub duration: Duration,

    /// URL of the executed request
    pub url: String,

    /// Outcome of the call
    pub outcome: CallOutcome,
}

impl CallResult {
    /// Result for a received response
    pub fn success(
        url: impl Into<String>,
        duration: Duration,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self {
            duration,
            url: url.into(),
            outcome: CallOutcome::Success {
                status,
                body: body.into(),
            },
        }
    }

    /// Result for a call that never got a response
    pub fn transport_error(
        url: impl Into<String>,
        duration: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            duration,
            url: url.into(),
            outcome: CallOutcome::TransportError {
                message: message.into(),
            },
        }
    }

    /// Elapsed time in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
