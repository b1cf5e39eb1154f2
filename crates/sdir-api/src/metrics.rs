//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;
use uuid::Uuid;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "sdir_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "sdir_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "sdir_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "sdir_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "sdir_analysis_duration_seconds";
    pub const SCENES_GENERATED_TOTAL: &str = "sdir_scenes_generated_total";
    pub const ANALYSIS_WARNINGS_TOTAL: &str = "sdir_analysis_warnings_total";

    // Render metrics
    pub const RENDERS_TOTAL: &str = "sdir_renders_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished analysis. `outcome` is `ok` or an error kind.
pub fn record_analysis(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record scenes and warnings produced by a successful analysis.
pub fn record_analysis_output(scenes: usize, warnings: usize) {
    counter!(names::SCENES_GENERATED_TOTAL).increment(scenes as u64);
    counter!(names::ANALYSIS_WARNINGS_TOTAL).increment(warnings as u64);
}

/// Record a render dispatch. `outcome` is `ok` or an error kind.
pub fn record_render(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::RENDERS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (segment ids become `:id`).
fn sanitize_path(path: &str) -> String {
    path.split('/')
        .map(|part| {
            if Uuid::parse_str(part).is_ok() {
                ":id"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
