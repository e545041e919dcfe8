//! Prometheus metrics for the pairing server.
//!
//! Metrics are exposed in Prometheus text format on a separate listener
//! (`METRICS_BIND`). When no exporter is installed the recording calls are no-ops.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sp_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/pairing", 200);
//! metrics::pairing_requests_total("ok");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Pairing Metrics
// ============================================================================

/// Count a pairing request by outcome (`ok` or the error kind).
pub fn pairing_requests_total(outcome: &str) {
    metrics::counter!("pairing_requests_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record the wall-clock time of one pairing computation in milliseconds.
pub fn pairing_duration_ms(duration_ms: f64) {
    metrics::histogram!("pairing_duration_ms").record(duration_ms);
}

/// Record the field size of paired tournaments.
pub fn pairing_players(count: usize) {
    metrics::histogram!("pairing_players").record(count as f64);
}
