//! Dispatcher for load run lifecycle management
//!
//! The Dispatcher coordinates one complete run:
//! - Feeding prepared requests into a bounded queue, in order
//! - Spawning a fixed pool of workers that drain it
//! - Merging every call result into a synchronized [`Aggregator`]
//! - Finalizing the run statistics once all workers have exited
//!
//! # Example
//!
//! ```ignore
//! use loadstats_core::{DispatcherBuilder, Request, RequestSource};
//!
//! let dispatcher = DispatcherBuilder::new()
//!     .workers(10)
//!     .executor(executor)
//!     .build()?;
//!
//! let requests = RequestSource::repeat(Request::get("http://localhost:8080/"), 1000);
//! let stats = dispatcher.run(requests).await?;
//! println!("avg {:.4}s, {} failures", stats.average_response_time(), stats.failure_count());
//! ```

mod aggregator;
mod builder;
mod pool;

pub use aggregator::Aggregator;
pub use builder::DispatcherBuilder;
pub use pool::{Dispatcher, RunReport};

use std::sync::Arc;

use crate::config::RunConfig;
use crate::error::BenchResult;
use crate::metrics::RunStatistics;
use crate::request::RequestSource;
use crate::traits::{Executor, NoopProgress};

/// Run `requests` on `workers` workers with no progress reporting
///
/// Shorthand for building a [`Dispatcher`] with default settings.
pub async fn run(
    requests: RequestSource,
    workers: usize,
    executor: Arc<dyn Executor>,
) -> BenchResult<RunStatistics> {
    Dispatcher::new(RunConfig::new(workers), executor, Arc::new(NoopProgress))
        .run(requests)
        .await
}

#[cfg(test)]
mod tests;
