//! loadstats-core: concurrent dispatch and aggregation engine
//!
//! This crate provides the engine behind the `loadstats` load generator:
//!
//! - Prepared requests and the ordered request source
//! - Core traits (Executor, ProgressSink)
//! - The worker pool and its dispatcher
//! - Synchronized result aggregation and run statistics
//! - Error handling
//!
//! Request construction, the HTTP transport and all rendering live in
//! sibling crates; this one only moves requests through workers and merges
//! what comes back.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod request;
pub mod response;
pub mod traits;
pub mod worker;

pub use channel::ChannelConfig;
pub use config::{ConfigError, RunConfig, DEFAULT_TIMEOUT, MAX_TIMEOUT};
pub use dispatcher::{Aggregator, Dispatcher, DispatcherBuilder, RunReport};
pub use error::*;
pub use metrics::*;
pub use request::*;
pub use response::*;
pub use traits::*;
pub use worker::{Worker, WorkerBuilder, WorkerStats};
