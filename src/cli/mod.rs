//! CLI argument parsing and command dispatch

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use loadstats_client::{ClientConfig, HttpExecutor};
use loadstats_core::{
    DispatcherBuilder, Method, NoopProgress, ProgressSink, Request, RequestSource, RunConfig,
    RunReport,
};
use loadstats_report::{print_failures, print_summary, JsonExporter};
use loadstats_ui::ProgressBarSink;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::plan::{parse_timeout, Plan, MAX_TOTAL_REQUESTS};

#[derive(Debug, Parser)]
#[command(name = "loadstats")]
#[command(author, version, about = "Concurrent HTTP load generator", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send the same request N times against one URL
    Run(RunArgs),
    /// Run the requests described in a YAML or JSON plan file
    Plan(PlanArgs),
    /// Validate a plan file without sending anything
    Validate {
        /// Path to the plan file
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Target URL
    pub url: String,

    /// Number of requests to send
    #[arg(short = 'n', long, default_value_t = 100)]
    pub requests: usize,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 10, env = "LOADSTATS_WORKERS")]
    pub workers: usize,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Request header, as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30.0)]
    pub timeout: f64,

    /// Request queue capacity (defaults to twice the worker count)
    #[arg(long)]
    pub queue_buffer: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Path to the plan file
    pub file: PathBuf,

    /// Number of concurrent workers (overrides the plan)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (overrides the plan)
    #[arg(long)]
    pub timeout: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Write the full run statistics as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write only the summary figures as JSON to this path
    #[arg(long)]
    pub json_summary: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Skip the failed-call table
    #[arg(long)]
    pub no_failures: bool,
}

impl RunArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = RunConfig::new(self.workers).with_timeout(parse_timeout(self.timeout)?);
        if let Some(size) = self.queue_buffer {
            config = config.with_queue_buffer(size);
        }
        Ok(config)
    }

    fn request_source(&self) -> RequestSource {
        let mut template = Request::new(self.method, self.url.clone());
        for (name, value) in &self.headers {
            template = template.with_header(name.clone(), value.clone());
        }
        if let Some(body) = &self.data {
            template = template.with_body(body.clone());
        }
        RequestSource::repeat(template, self.requests)
    }
}

/// Parse a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Dispatch a parsed command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            if args.requests == 0 {
                bail!("--requests must be at least 1");
            }
            if args.requests > MAX_TOTAL_REQUESTS {
                bail!("--requests must be at most {MAX_TOTAL_REQUESTS}");
            }
            let config = args.run_config()?;
            run_load(args.request_source(), config, &args.output).await
        }
        Commands::Plan(args) => {
            let plan = Plan::load(&args.file)?;
            let config = plan.run_config(args.workers, args.timeout)?;
            tracing::info!(
                plan = %args.file.display(),
                requests = plan.total_requests(),
                "Loaded plan"
            );
            run_load(plan.request_source(), config, &args.output).await
        }
        Commands::Validate { file } => {
            let plan = Plan::load(&file)?;
            println!(
                "{}: ok ({} requests x {} = {} calls)",
                file.display(),
                plan.requests.len(),
                plan.repeat,
                plan.total_requests()
            );
            Ok(())
        }
    }
}

async fn run_load(requests: RequestSource, config: RunConfig, output: &OutputArgs) -> Result<()> {
    let executor = HttpExecutor::new(ClientConfig::from_run_config(&config))
        .context("Failed to build HTTP client")?;

    let progress: Arc<dyn ProgressSink> = if output.no_progress {
        Arc::new(NoopProgress)
    } else {
        Arc::new(ProgressBarSink::new(requests.len()))
    };

    let dispatcher = DispatcherBuilder::new()
        .config(config)
        .executor(Arc::new(executor))
        .progress(progress)
        .build()?;

    println!("Starting load test...");
    let report = dispatcher.run_detailed(requests).await?;
    log_workers(&report);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    print_summary(&report.statistics, &mut out)?;
    if !output.no_failures {
        print_failures(&report.statistics, &mut out)?;
    }
    out.flush()?;

    if let Some(path) = &output.json {
        JsonExporter::export(&report.statistics, path)?;
        tracing::info!(path = %path.display(), "Wrote run statistics");
    }

    if let Some(path) = &output.json_summary {
        JsonExporter::export_summary(&report.statistics, path)?;
        tracing::info!(path = %path.display(), "Wrote run summary");
    }

    Ok(())
}

fn log_workers(report: &RunReport) {
    for worker in &report.workers {
        tracing::debug!(
            worker_id = worker.worker_id,
            processed = worker.processed,
            failures = worker.failures,
            transport_errors = worker.transport_errors,
            elapsed = ?worker.elapsed(),
            "Worker summary"
        );
    }

    let totals = report.totals();
    tracing::debug!(
        workers = report.workers.len(),
        idle_workers = report.workers.iter().filter(|w| w.is_idle()).count(),
        processed = totals.processed,
        failures = totals.failures,
        transport_errors = totals.transport_errors,
        "All workers finished"
    );
}
