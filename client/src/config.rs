//! HTTP client configuration

use std::time::Duration;

use loadstats_core::{RunConfig, DEFAULT_TIMEOUT, MAX_TIMEOUT};
use thiserror::Error;

/// Configuration validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A timeout value is out of acceptable range.
    #[error("invalid timeout: {0:?}")]
    InvalidTimeout(Duration),

    /// Too many redirects allowed.
    #[error("invalid redirect limit: {0}")]
    InvalidRedirectLimit(usize),
}

/// Settings for the reqwest client behind [`HttpExecutor`](crate::HttpExecutor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-call timeout, from connect to the last body byte
    pub request_timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Maximum redirects followed before the redirect itself is returned
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            connect_timeout: default_connect_timeout(),
            max_redirects: 10,
            user_agent: concat!("loadstats/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Client settings matching a run configuration's timeout
    pub fn from_run_config(config: &RunConfig) -> Self {
        Self::default().with_request_timeout(config.timeout)
    }

    /// Set the request timeout.
    ///
    /// The connect timeout is clamped so it never exceeds the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the redirect limit; `0` disables following redirects.
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.request_timeout.is_zero() || self.request_timeout > MAX_TIMEOUT {
            return Err(ConfigValidationError::InvalidTimeout(self.request_timeout));
        }
        if self.connect_timeout.is_zero() || self.connect_timeout > self.request_timeout {
            return Err(ConfigValidationError::InvalidTimeout(self.connect_timeout));
        }
        if self.max_redirects > 100 {
            return Err(ConfigValidationError::InvalidRedirectLimit(
                self.max_redirects,
            ));
        }
        Ok(())
    }
}
