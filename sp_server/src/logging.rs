//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber; records emitted through the `log` facade by
//! the pairing engine are forwarded into it.

use sha2::{Digest, Sha256};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Levels are configured through the `RUST_LOG` env var (default `info`).
///
/// # Example
///
/// ```no_run
/// use sp_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // `init` also installs the `log` -> `tracing` bridge
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Short SHA-256 digest of a request payload, used to correlate identical
/// tournaments across log lines without logging the payload itself
pub fn payload_digest(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    hex::encode(&digest[..8])
}

/// Log performance metric
///
/// # Example
///
/// ```
/// use sp_server::logging::log_performance;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// // ... do work ...
/// let duration = start.elapsed().as_millis() as u64;
/// log_performance("calculate_pairing", duration, Some("64 players"));
/// ```
pub fn log_performance(operation: &str, duration_ms: u64, metadata: Option<&str>) {
    if duration_ms > 1000 {
        tracing::warn!(
            operation = operation,
            duration_ms = duration_ms,
            metadata = metadata,
            "PERFORMANCE: Slow operation"
        );
    } else {
        tracing::debug!(
            operation = operation,
            duration_ms = duration_ms,
            metadata = metadata,
            "Performance metric"
        );
    }
}

/// Log an incoming pairing request
///
/// # Arguments
///
/// * `request_id` - Correlation id of the HTTP request
/// * `digest` - Payload digest from [`payload_digest`]
/// * `players` - Registered players
/// * `round_no` - Round about to be paired
pub fn log_pairing_request(request_id: &str, digest: &str, players: usize, round_no: u32) {
    tracing::info!(
        request_id = request_id,
        tournament_digest = digest,
        players = players,
        round_no = round_no,
        "Pairing requested"
    );
}

/// Log the outcome of a pairing request
pub fn log_pairing_outcome(request_id: &str, outcome: &str, duration_ms: u64) {
    if outcome == "ok" {
        tracing::info!(
            request_id = request_id,
            outcome = outcome,
            duration_ms = duration_ms,
            "Pairing completed"
        );
    } else {
        tracing::warn!(
            request_id = request_id,
            outcome = outcome,
            duration_ms = duration_ms,
            "Pairing failed"
        );
    }
}
