//! Client construction errors

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Errors raised while building an [`HttpExecutor`](crate::HttpExecutor).
///
/// Per-request failures never show up here; they are reported as transport
/// errors in the call result.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client settings failed validation
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigValidationError),

    /// reqwest refused to build the client (TLS backend, ...)
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
