//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): dispatched requests by status, backend
//! - `balancer_upstream_duration_seconds` (histogram): backend response time
//! - `balancer_backend_up` (gauge): 1=reachable, 0=unreachable, per probe
//! - `balancer_pool_size` (gauge): members after each health tick

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one dispatched request.
///
/// `backend` is `"none"` when no backend was selected.
pub fn record_request(status: u16, backend: &str) {
    metrics::counter!(
        "balancer_requests_total",
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
}

/// Record time until the backend's response headers arrived.
pub fn record_upstream_duration(backend: &str, elapsed: Duration) {
    metrics::histogram!(
        "balancer_upstream_duration_seconds",
        "backend" => backend.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record one probe result.
pub fn record_backend_health(backend: &str, reachable: bool) {
    metrics::gauge!("balancer_backend_up", "backend" => backend.to_string())
        .set(if reachable { 1.0 } else { 0.0 });
}

/// Record the pool size after a replacement.
pub fn record_pool_size(size: usize) {
    metrics::gauge!("balancer_pool_size").set(size as f64);
}
