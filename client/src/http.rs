//! reqwest-backed executor

use std::error::Error as _;
use std::time::Instant;

use async_trait::async_trait;
use loadstats_core::{CallResult, Executor, Method, Request};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Executes prepared requests with a shared reqwest client
///
/// One instance is shared by every worker of a run, so connections are
/// pooled across workers. Every call is bounded by
/// [`ClientConfig::request_timeout`]; a call that exceeds it comes back as
/// a transport error.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    config: ClientConfig,
}

impl HttpExecutor {
    /// Create an executor from validated client settings
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { client, config })
    }

    /// Executor with default settings
    pub fn with_defaults() -> Result<Self, ClientError> {
        Self::new(ClientConfig::default())
    }

    /// Settings this executor was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_request(&self, request: &Request) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        builder
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            return format!(
                "request timed out after {:?}",
                self.config.request_timeout
            );
        }

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn execute(&self, request: &Request) -> CallResult {
        let start = Instant::now();

        match self.build_request(request).send().await {
            Ok(response) => {
                // Latency is time to response headers; reading the body is not timed.
                let elapsed = start.elapsed();
                let status = response.status().as_u16();
                let body = match response.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::debug!(url = %request.url, error = %e, "Failed to read response body");
                        format!("failed to read response body: {}", self.describe(&e))
                    }
                };
                CallResult::success(&request.url, elapsed, status, body)
            }
            Err(e) => CallResult::transport_error(&request.url, start.elapsed(), self.describe(&e)),
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}
