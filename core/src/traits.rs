//! Core traits for executors and progress sinks
//!
//! These traits are defined in core so the dispatcher can be driven by any
//! transport and any progress display. Implementations live in their
//! respective crates (client/, ui/).

use crate::request::Request;
use crate::response::CallResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Executor Trait
// ============================================================================

/// Performs one prepared request against the target
///
/// Implementations measure the wall-clock time around the call and never
/// classify the outcome: any received response is a
/// [`CallOutcome::Success`](crate::response::CallOutcome::Success), and
/// only a missing response is a transport error. Executors must always
/// return; bounding a hung connection is their job, typically through
/// [`RunConfig::timeout`](crate::config::RunConfig::timeout).
#[async_trait]
pub trait Executor: Send + Sync {
    /// Executor identifier (e.g., "reqwest")
    fn name(&self) -> &str;

    /// Execute `request` and report how long it took and how it ended
    async fn execute(&self, request: &Request) -> CallResult;
}

// ============================================================================
// Progress Sink Trait
// ============================================================================

/// Receives one signal per completed request
///
/// Called concurrently from every worker. Progress is observational only;
/// nothing in the dispatcher depends on what a sink does with it.
pub trait ProgressSink: Send + Sync {
    /// One request finished (successfully or not)
    fn increment(&self);

    /// All requests finished
    fn finish(&self) {}
}

/// Progress sink that ignores every signal
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn increment(&self) {}
}

/// Progress sink that only counts signals
#[derive(Debug, Default)]
pub struct CountingProgress {
    count: AtomicUsize,
    finished: AtomicUsize,
}

impl CountingProgress {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments received so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Number of times `finish` was called
    pub fn finish_calls(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ProgressSink for CountingProgress {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
