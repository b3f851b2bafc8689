//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, Encoder, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

/// Latency buckets, in seconds.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Counts one finished request.
    fn record_request(&self, method: &str, endpoint: &str, status: u16);

    /// Records the duration of a finished request.
    fn record_request_duration(&self, method: &str, endpoint: &str, duration_secs: f64);

    /// Moves the in-flight request gauge by `delta`.
    fn adjust_active_requests(&self, delta: i64);

    /// Overwrites the task gauges with fresh counts.
    fn set_task_gauges(&self, total: u64, completed: u64);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Request metrics
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_requests_in_flight: IntGauge,

    // Task metrics
    tasks_total: IntGauge,
    tasks_completed: IntGauge,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        // Request metrics
        let http_requests_total = register_int_counter_vec_with_registry!(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
            registry.clone()
        )
        .expect("Failed to register http_requests_total");

        let http_request_duration_seconds = register_histogram_vec_with_registry!(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            &["method", "endpoint"],
            LATENCY_BUCKETS.to_vec(),
            registry.clone()
        )
        .expect("Failed to register http_request_duration_seconds");

        let http_requests_in_flight = register_int_gauge_with_registry!(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
            registry.clone()
        )
        .expect("Failed to register http_requests_in_flight");

        // Task metrics
        let tasks_total = register_int_gauge_with_registry!(
            "tasks_total",
            "Number of tasks currently stored",
            registry.clone()
        )
        .expect("Failed to register tasks_total");

        let tasks_completed = register_int_gauge_with_registry!(
            "tasks_completed",
            "Number of stored tasks marked done",
            registry.clone()
        )
        .expect("Failed to register tasks_completed");

        Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            tasks_total,
            tasks_completed,
        }
    }

    /// Renders all metrics in Prometheus text format.
    ///
    /// Each sample is read atomically; a scrape racing with writers may mix
    /// values from before and after a given request.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics are not valid UTF-8: {}", e)))
    }

    /// Current value of the in-flight request gauge.
    pub fn active_requests(&self) -> i64 {
        self.http_requests_in_flight.get()
    }

    /// Current value of the request counter for one label set.
    pub fn request_count(&self, method: &str, endpoint: &str, status: u16) -> u64 {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .get()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, method: &str, endpoint: &str, status: u16) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();
    }

    fn record_request_duration(&self, method: &str, endpoint: &str, duration_secs: f64) {
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_secs);
    }

    fn adjust_active_requests(&self, delta: i64) {
        self.http_requests_in_flight.add(delta);
    }

    fn set_task_gauges(&self, total: u64, completed: u64) {
        self.tasks_total.set(total as i64);
        self.tasks_completed.set(completed as i64);
    }
}
