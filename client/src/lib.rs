//! HTTP executor for loadstats
//!
//! This crate provides the [`Executor`](loadstats_core::Executor)
//! implementation that actually talks to the target:
//!
//! - [`HttpExecutor`]: a pooled reqwest client with an explicit per-call timeout
//! - [`ClientConfig`]: timeouts, redirect policy and User-Agent

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod http;

pub use config::{ClientConfig, ConfigValidationError};
pub use error::ClientError;
pub use http::HttpExecutor;
