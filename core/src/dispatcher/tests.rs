//! Tests for the Dispatcher module

use super::aggregator::Aggregator;
use super::builder::DispatcherBuilder;
use super::run;
use crate::error::BenchError;
use crate::request::{Request, RequestSource};
use crate::response::CallResult;
use crate::traits::{CountingProgress, Executor};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Stub Executor
// ============================================================================

type StatusFn = Box<dyn Fn(u64) -> Option<u16> + Send + Sync>;

/// Deterministic executor: the status for each request is derived from its id,
/// `None` meaning a transport error.
struct StubExecutor {
    duration: Duration,
    delay: Option<Duration>,
    status_for: StatusFn,
    panic_on: Option<u64>,
    seen: Mutex<Vec<u64>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubExecutor {
    fn new(status_for: impl Fn(u64) -> Option<u16> + Send + Sync + 'static) -> Self {
        Self {
            duration: Duration::from_millis(100),
            delay: None,
            status_for: Box::new(status_for),
            panic_on: None,
            seen: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    fn ok() -> Self {
        Self::new(|_| Some(200))
    }

    fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_panic_on(mut self, id: u64) -> Self {
        self.panic_on = Some(id);
        self
    }

    fn seen(&self) -> Vec<u64> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for StubExecutor {
    fn name(&self) -> &str {
        "stub"
    }

    async fn execute(&self, request: &Request) -> CallResult {
        let id = request.id.0;
        if self.panic_on == Some(id) {
            panic!("stub executor asked to fail on request {id}");
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.seen.lock().unwrap().push(id);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match (self.status_for)(id) {
            Some(status) => CallResult::success(
                &request.url,
                self.duration,
                status,
                format!("status {status}"),
            ),
            None => CallResult::transport_error(&request.url, self.duration, "connection refused"),
        }
    }
}

fn requests(count: usize) -> RequestSource {
    RequestSource::repeat(Request::get("http://localhost:8080/"), count)
}

// ============================================================================
// Aggregator Tests
// ============================================================================

#[test]
fn test_finalize_empty_is_error() {
    let result = Aggregator::new().finalize();
    assert!(matches!(result, Err(BenchError::EmptyRun)));
}

#[test]
fn test_aggregator_records_failures() {
    let aggregator = Aggregator::new();
    let d = Duration::from_millis(10);

    assert!(!aggregator.record(CallResult::success("http://a/", d, 200, "ok")));
    assert!(aggregator.record(CallResult::success("http://b/", d, 404, "missing")));
    assert!(aggregator.record(CallResult::transport_error("http://c/", d, "timed out")));

    let stats = aggregator.finalize().unwrap();
    assert_eq!(stats.total_requests(), 3);
    assert_eq!(stats.failure_count(), 2);
    assert_eq!(stats.failure_log().len(), 2);

    let http = &stats.failure_log()[0];
    assert_eq!(http.status_code, Some(404));
    assert_eq!(http.url, "http://b/");
    assert_eq!(http.response_body, "missing");

    let transport = &stats.failure_log()[1];
    assert!(transport.is_transport_error());
    assert_eq!(transport.url, "http://c/");
    assert_eq!(transport.response_body, "timed out");
}

#[test]
fn test_aggregator_status_boundary() {
    let aggregator = Aggregator::new();
    let d = Duration::from_millis(1);

    assert!(!aggregator.record(CallResult::success("http://a/", d, 299, "")));
    assert!(aggregator.record(CallResult::success("http://a/", d, 300, "")));
    assert!(aggregator.record(CallResult::success("http://a/", d, 301, "")));

    assert_eq!(aggregator.failure_count(), 2);
}

#[test]
fn test_average_is_order_independent() {
    let durations = [0.05, 0.3, 0.12, 1.5, 0.007, 0.42];

    let forward = Aggregator::new();
    for secs in durations {
        forward.record(CallResult::success(
            "http://a/",
            Duration::from_secs_f64(secs),
            200,
            "",
        ));
    }

    let backward = Aggregator::new();
    for secs in durations.iter().rev() {
        backward.record(CallResult::success(
            "http://a/",
            Duration::from_secs_f64(*secs),
            200,
            "",
        ));
    }

    let expected = durations.iter().sum::<f64>() / durations.len() as f64;
    let forward = forward.finalize().unwrap().average_response_time();
    let backward = backward.finalize().unwrap().average_response_time();

    assert!((forward - expected).abs() < 1e-6);
    assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn test_aggregator_no_lost_updates_across_threads() {
    let aggregator = Arc::new(Aggregator::new());
    let threads = 8;
    let per_thread = 500;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let aggregator = Arc::clone(&aggregator);
            std::thread::spawn(move || {
                for i in 0..per_thread {
                    let status = if (t + i) % 5 == 0 { 503 } else { 200 };
                    aggregator.record(CallResult::success(
                        "http://a/",
                        Duration::from_millis(1),
                        status,
                        "",
                    ));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected_failures = (0..threads)
        .flat_map(|t| (0..per_thread).map(move |i| (t + i) % 5 == 0))
        .filter(|failed| *failed)
        .count();

    let stats = Arc::try_unwrap(aggregator).unwrap().finalize().unwrap();
    assert_eq!(stats.total_requests(), threads * per_thread);
    assert_eq!(stats.failure_count(), expected_failures);
    assert_eq!(stats.failure_log().len(), expected_failures);
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_missing_executor() {
    let err = DispatcherBuilder::new().workers(2).build().unwrap_err();
    assert!(err.to_string().contains("executor"));
}

#[test]
fn test_builder_rejects_zero_workers() {
    let err = DispatcherBuilder::new()
        .workers(0)
        .executor(Arc::new(StubExecutor::ok()))
        .build()
        .unwrap_err();

    assert!(matches!(err, BenchError::Config(_)));
}

#[test]
fn test_builder_applies_settings() {
    let dispatcher = DispatcherBuilder::new()
        .workers(3)
        .timeout(Duration::from_secs(7))
        .queue_buffer(1)
        .executor(Arc::new(StubExecutor::ok()))
        .build()
        .unwrap();

    assert_eq!(dispatcher.config().workers, 3);
    assert_eq!(dispatcher.config().timeout, Duration::from_secs(7));
    assert_eq!(dispatcher.config().queue_buffer, Some(1));
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_all_success_average() {
    let stats = run(requests(10), 4, Arc::new(StubExecutor::ok()))
        .await
        .unwrap();

    assert_eq!(stats.total_requests(), 10);
    assert_eq!(stats.failure_count(), 0);
    assert!(stats.failure_log().is_empty());
    assert!((stats.average_response_time() - 0.1).abs() < 1e-9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_some_server_errors() {
    let executor = StubExecutor::new(|id| Some(if id % 3 == 2 { 500 } else { 200 }));

    let stats = run(requests(10), 4, Arc::new(executor)).await.unwrap();

    assert_eq!(stats.total_requests(), 10);
    assert_eq!(stats.failure_count(), 3);
    assert_eq!(stats.failure_log().len(), 3);
    assert!(stats
        .failure_log()
        .iter()
        .all(|f| f.status_code == Some(500) && f.response_body == "status 500"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_status_300_counts_as_failure() {
    let executor = StubExecutor::new(|id| Some(299 + id as u16));

    let stats = run(requests(3), 2, Arc::new(executor)).await.unwrap();

    let mut codes: Vec<_> = stats
        .failure_log()
        .iter()
        .filter_map(|f| f.status_code)
        .collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![300, 301]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_more_workers_than_requests() {
    let executor = Arc::new(StubExecutor::ok());
    let dispatcher = DispatcherBuilder::new()
        .workers(5)
        .executor(executor.clone())
        .build()
        .unwrap();

    let report = dispatcher.run_detailed(requests(1)).await.unwrap();

    assert_eq!(report.workers.len(), 5);
    assert_eq!(report.workers.iter().filter(|w| w.processed == 1).count(), 1);
    assert_eq!(report.workers.iter().filter(|w| w.is_idle()).count(), 4);
    assert_eq!(report.statistics.total_requests(), 1);
    assert_eq!(executor.seen(), vec![0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_transport_errors_do_not_abort() {
    let executor = StubExecutor::new(|_| None);

    let stats = run(requests(12), 3, Arc::new(executor)).await.unwrap();

    assert_eq!(stats.total_requests(), 12);
    assert_eq!(stats.response_times().len(), 12);
    assert_eq!(stats.failure_count(), 12);
    assert!(stats.failure_log().iter().all(|f| f.is_transport_error()));
    assert_eq!(stats.success_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_request_executed_exactly_once() {
    let total = 50;

    for workers in [1, 2, 3, 7, 16, 50] {
        let executor = Arc::new(StubExecutor::ok().with_delay(Duration::from_millis(1)));

        let stats = run(requests(total), workers, executor.clone())
            .await
            .unwrap();
        assert_eq!(stats.total_requests(), total);

        let mut seen: HashMap<u64, usize> = HashMap::new();
        for id in executor.seen() {
            *seen.entry(id).or_default() += 1;
        }

        assert_eq!(seen.len(), total, "workers = {workers}");
        assert!(
            seen.values().all(|count| *count == 1),
            "duplicate execution with {workers} workers"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_lost_updates_under_contention() {
    let total = 400;
    let executor = StubExecutor::new(|id| Some(if id % 4 == 0 { 502 } else { 200 }))
        .with_duration(Duration::from_millis(3));

    let stats = run(requests(total), 8, Arc::new(executor)).await.unwrap();

    assert_eq!(stats.total_requests(), total);
    assert_eq!(stats.failure_count(), total / 4);
    assert_eq!(stats.failure_log().len(), total / 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_progress_signalled_once_per_request() {
    let progress = Arc::new(CountingProgress::new());
    let dispatcher = DispatcherBuilder::new()
        .workers(4)
        .executor(Arc::new(StubExecutor::new(|id| {
            if id % 2 == 0 {
                Some(200)
            } else {
                None
            }
        })))
        .progress(progress.clone())
        .build()
        .unwrap();

    dispatcher.run(requests(25)).await.unwrap();

    assert_eq!(progress.count(), 25);
    assert_eq!(progress.finish_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_workers_run_concurrently() {
    let executor = Arc::new(StubExecutor::ok().with_delay(Duration::from_millis(20)));

    run(requests(8), 4, executor.clone()).await.unwrap();

    let peak = executor.peak_in_flight.load(Ordering::SeqCst);
    assert!(peak > 1, "peak in-flight was {peak}");
    assert!(peak <= 4, "peak in-flight was {peak}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_slot_queue_processes_everything() {
    let dispatcher = DispatcherBuilder::new()
        .workers(3)
        .queue_buffer(1)
        .executor(Arc::new(StubExecutor::ok()))
        .build()
        .unwrap();

    let stats = dispatcher.run(requests(30)).await.unwrap();
    assert_eq!(stats.total_requests(), 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_report_totals_match_statistics() {
    let executor = StubExecutor::new(|id| match id % 4 {
        0 => Some(500),
        1 => None,
        _ => Some(200),
    });

    let dispatcher = DispatcherBuilder::new()
        .workers(3)
        .executor(Arc::new(executor))
        .build()
        .unwrap();

    let report = dispatcher.run_detailed(requests(20)).await.unwrap();
    let totals = report.totals();

    assert_eq!(report.workers.len(), 3);
    assert_eq!(totals.processed, report.statistics.total_requests());
    assert_eq!(totals.failures, report.statistics.failure_count());
    assert_eq!(totals.failures, 10);
    assert_eq!(totals.transport_errors, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_timeout_applies_to_any_executor() {
    let executor = StubExecutor::ok().with_delay(Duration::from_secs(5));

    let dispatcher = DispatcherBuilder::new()
        .workers(2)
        .timeout(Duration::from_millis(50))
        .executor(Arc::new(executor))
        .build()
        .unwrap();

    let stats = dispatcher.run(requests(4)).await.unwrap();

    assert_eq!(stats.total_requests(), 4);
    assert_eq!(stats.failure_count(), 4);
    assert!(stats.failure_log().iter().all(|f| f.status_code.is_none()));
}

#[tokio::test]
async fn test_empty_request_source_is_rejected() {
    let executor = Arc::new(StubExecutor::ok());

    let result = run(RequestSource::default(), 2, executor.clone()).await;

    assert!(matches!(result, Err(BenchError::EmptyRun)));
    assert!(executor.seen().is_empty());
}

#[tokio::test]
async fn test_zero_workers_fails_before_any_work() {
    let executor = Arc::new(StubExecutor::ok());

    let result = run(requests(5), 0, executor.clone()).await;

    assert!(matches!(result, Err(BenchError::Config(_))));
    assert!(executor.seen().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_panic_fails_the_run() {
    let executor = StubExecutor::ok().with_panic_on(3);

    let result = run(requests(10), 2, Arc::new(executor)).await;

    assert!(matches!(result, Err(BenchError::Worker(_))));
}
