//! HTTP API of the pairing server.
//!
//! # Endpoints Overview
//!
//! - `POST /api/v1/pairing` - Compute the next round of a tournament
//! - `GET /health` - Server health status
//!
//! Every response carries an `x-request-id` header.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sp_server::api::{create_router, AppState};
//! use std::{sync::Arc, time::Duration};
//! use swiss_pairing::PairingEngine;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     engine: Arc::new(PairingEngine::default()),
//!     pairing_timeout: Duration::from_secs(5),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:23239").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively; the API carries no credentials.

pub mod pairing;
pub mod request_id;

use axum::{
    Router,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use swiss_pairing::PairingEngine;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// The engine holds only configuration, so a single instance serves every request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PairingEngine>,
    /// Wall-clock limit of one pairing computation
    pub pairing_timeout: Duration,
}

/// Create the API router with all endpoints and middleware.
///
/// ```text
/// GET  /health                         - Health check
/// POST /api/v1/pairing                 - CalculatePairing
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new().route("/pairing", post(pairing::calculate_pairing));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::track_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:23239/health
/// # {"status":"healthy","version":"0.1.0","timestamp":"2026-10-16T10:30:00Z"}
/// ```
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
