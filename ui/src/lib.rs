//! Terminal progress reporting for load runs
//!
//! This crate provides an indicatif-based [`ProgressSink`] showing elapsed
//! time, a bar, and completed/total requests while a run is in flight.

#![warn(missing_docs)]
#![warn(clippy::all)]

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use loadstats_core::ProgressSink;

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Progress bar advanced once per completed request
///
/// `ProgressBar` is internally synchronized, so workers call
/// [`increment`](ProgressSink::increment) without any extra locking.
#[derive(Debug, Clone)]
pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    /// Bar drawn on stderr for `total` requests
    pub fn new(total: usize) -> Self {
        Self::with_bar(ProgressBar::new(total as u64))
    }

    /// Bar that tracks progress without drawing anything
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(total as u64),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Requests completed so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Whether the bar has been finished
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl ProgressSink for ProgressBarSink {
    fn increment(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
