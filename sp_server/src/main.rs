//! Swiss pairing server.
//!
//! Serves `CalculatePairing` over HTTP. Each request carries the complete
//! tournament, so the server keeps no state between requests.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use sp_server::{api, config::ServerConfig, logging, metrics};
use swiss_pairing::PairingEngine;
use tracing::info;

const HELP: &str = "\
Run the Swiss pairing server

USAGE:
  sp_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:23239]
  --timeout    MS          Pairing time limit          [default: env PAIRING_TIMEOUT_MS or 5000]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:8080)
  PAIRING_TIMEOUT_MS           Wall-clock limit per pairing request
  METRICS_BIND                 Prometheus exporter address (disabled when unset)
  PAIRING_BYE_POINTS           Points for a pairing-bye (default: 1)
  PAIRING_TRACK_BYES           Avoid repeat pairing-byes (default: true)
  PAIRING_MAX_SEARCH_ATTEMPTS  Per-bracket search budget (default: 10000)
  PAIRING_MAX_COLOUR_DIFF      Colour difference bound (default: 2)
  RUST_LOG                     Log filter (default: info)
";

struct Args {
    bind: Option<SocketAddr>,
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        timeout_ms: pargs.opt_value_from_str("--timeout")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.timeout_ms)
        .context("Invalid server configuration")?;
    info!(
        "Pairing config: bye {} points, track byes: {}, search budget {}, max colour difference {}",
        config.pairing.pairing_bye_points,
        config.pairing.track_pairing_byes,
        config.pairing.max_search_attempts,
        config.pairing.max_colour_difference
    );

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exposed at http://{}/metrics", metrics_bind);
    }

    let state = api::AppState {
        engine: Arc::new(PairingEngine::new(config.pairing.clone())),
        pairing_timeout: config.pairing_timeout(),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
