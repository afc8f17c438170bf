//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): sampled requests by handler, method, status, path
//! - `http_request_duration_seconds` (histogram): sampled latency distribution
//!
//! # Design Decisions
//! - The recorder is owned by application state, never installed globally
//! - Only a fraction of requests is recorded; the response is never affected

use std::time::{Duration, Instant};

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::Unit;
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const REQUESTS_TOTAL: &str = "http_requests_total";

/// Prometheus client default latency buckets.
const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Labels attached to every observation.
#[derive(Debug, Clone)]
pub struct RequestLabels {
    pub handler: &'static str,
    pub method: String,
    pub status: u16,
    pub path: String,
}

/// Sampled request instrumentation backed by a private Prometheus recorder.
pub struct MetricsRecorder {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    sample_rate: f64,
}

impl MetricsRecorder {
    pub fn new(sample_rate: f64) -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &DEFAULT_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_histogram!(
                REQUEST_DURATION,
                Unit::Seconds,
                "Histogram of request latencies"
            );
            metrics::describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
        });

        Ok(Self {
            recorder,
            handle,
            sample_rate: sample_rate.clamp(0.0, 1.0),
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Independent draw per request.
    pub fn should_sample(&self) -> bool {
        fastrand::f64() < self.sample_rate
    }

    /// Record one observation unconditionally.
    pub fn record(&self, labels: &RequestLabels, elapsed: Duration) {
        let label_set = [
            ("handler", labels.handler.to_string()),
            ("method", labels.method.clone()),
            ("status", labels.status.to_string()),
            ("path", labels.path.clone()),
        ];

        metrics::with_local_recorder(&self.recorder, || {
            metrics::histogram!(REQUEST_DURATION, &label_set).record(elapsed.as_secs_f64());
            metrics::counter!(REQUESTS_TOTAL, &label_set).increment(1);
        });
    }

    /// Run `next`, then record it with probability `sample_rate`.
    pub async fn track(&self, handler: &'static str, request: Request<Body>, next: Next) -> Response {
        let start = Instant::now();
        let method = request.method().to_string();
        let path = request.uri().path().to_owned();

        let response = next.run(request).await;

        if self.should_sample() {
            let labels = RequestLabels {
                handler,
                method,
                status: response.status().as_u16(),
                path,
            };
            self.record(&labels, start.elapsed());
        }

        response
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}
