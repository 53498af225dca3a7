//! Plan files: a batch of prepared requests plus run settings
//!
//! ```yaml
//! workers: 8
//! timeout_secs: 5
//! repeat: 100
//! requests:
//!   - url: http://localhost:8080/health
//!   - method: POST
//!     url: http://localhost:8080/items
//!     headers: [["Content-Type", "application/json"]]
//!     body: '{"name": "widget"}'
//! ```

use anyhow::{bail, Context, Result};
use loadstats_core::{Request, RequestSource, RunConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Most calls a single run may expand to
pub const MAX_TOTAL_REQUESTS: usize = 10_000_000;

/// A plan file as written on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Worker count (CLI flag wins)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Per-call timeout in seconds (CLI flag wins)
    #[serde(default)]
    pub timeout_secs: Option<f64>,

    /// Request queue capacity
    #[serde(default)]
    pub queue_buffer: Option<usize>,

    /// How many times the request list is sent, in order
    #[serde(default = "default_repeat")]
    pub repeat: usize,

    /// Requests, in submission order
    pub requests: Vec<Request>,
}

fn default_repeat() -> usize {
    1
}

impl Plan {
    /// Load a plan, parsing YAML for `.yaml`/`.yml` files and JSON otherwise
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );

        let plan: Plan = if is_yaml {
            serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML plan: {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON plan: {}", path.display()))?
        };

        plan.validate()?;
        Ok(plan)
    }

    /// Check the plan can produce a non-empty run
    pub fn validate(&self) -> Result<()> {
        if self.requests.is_empty() {
            bail!("plan contains no requests");
        }
        if self.repeat == 0 {
            bail!("repeat must be at least 1");
        }
        match self.requests.len().checked_mul(self.repeat) {
            Some(total) if total <= MAX_TOTAL_REQUESTS => {}
            _ => bail!(
                "plan expands to more than {MAX_TOTAL_REQUESTS} calls ({} requests x repeat {})",
                self.requests.len(),
                self.repeat
            ),
        }
        if let Some(idx) = self.requests.iter().position(|r| r.url.trim().is_empty()) {
            bail!("request #{} has an empty url", idx + 1);
        }
        self.run_config(None, None)?
            .validate()
            .context("invalid run settings in plan")?;
        Ok(())
    }

    /// Run settings, with CLI overrides applied
    pub fn run_config(&self, workers: Option<usize>, timeout_secs: Option<f64>) -> Result<RunConfig> {
        let mut config = RunConfig::new(workers.or(self.workers).unwrap_or(1));

        if let Some(secs) = timeout_secs.or(self.timeout_secs) {
            config = config.with_timeout(parse_timeout(secs)?);
        }
        if let Some(size) = self.queue_buffer {
            config = config.with_queue_buffer(size);
        }

        Ok(config)
    }

    /// Number of requests the plan expands to
    pub fn total_requests(&self) -> usize {
        self.requests.len().saturating_mul(self.repeat)
    }

    /// The request list repeated `repeat` times
    pub fn request_source(&self) -> RequestSource {
        let mut requests = Vec::with_capacity(self.total_requests());
        for _ in 0..self.repeat {
            requests.extend(self.requests.iter().cloned());
        }
        RequestSource::new(requests)
    }
}

/// Convert a timeout in seconds into a `Duration`
pub fn parse_timeout(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("invalid timeout: {secs} seconds"))
}
