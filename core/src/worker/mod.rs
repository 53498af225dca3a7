//! Worker module for executing queued requests
//!
//! The Worker is the execution unit of a run, responsible for the simple but
//! critical loop: **pull -> execute -> record -> signal -> repeat**.
//!
//! Each Worker is a tokio task that:
//!
//! 1. Pulls the next request from the shared bounded queue
//! 2. Executes it via an [`Executor`](crate::traits::Executor)
//! 3. Records the result in the shared aggregator
//! 4. Signals the progress sink exactly once
//! 5. Repeats until the queue is closed and drained
//!
//! # Example
//!
//! ```ignore
//! use loadstats_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .executor(executor)
//!     .queue(queue)
//!     .aggregator(aggregator)
//!     .progress(progress)
//!     .build()?;
//!
//! let stats = worker.run().await;
//! println!("Processed: {}", stats.processed);
//! ```

mod builder;
mod stats;
mod task;

pub use builder::WorkerBuilder;
pub use stats::WorkerStats;
pub use task::{SharedQueue, Worker};
