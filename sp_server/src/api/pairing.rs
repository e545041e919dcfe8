//! `CalculatePairing` API handler.
//!
//! The pairing search is CPU-bound, so it runs on the blocking pool under the
//! configured time limit. When the limit expires the request answers `504` and
//! the search is told to stop through its cancel flag.
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:23239/api/v1/pairing \
//!   -H "Content-Type: application/json" \
//!   -d '{"tournament": {"all_rounds_no": 3, "players": [{"start_no": 1}, {"start_no": 2}]}}'
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use swiss_pairing::{
    CancelFlag, CalculatePairingRequest, CalculatePairingResponse, PairingError,
};

use super::{AppState, request_id::RequestId};
use crate::{logging, metrics};

/// Error body of every failed API call
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error kind, e.g. `AllRoundsPaired`
    pub error: String,
    /// Human-readable description
    pub message: String,
}

/// A failed request: status code plus [`ErrorResponse`] body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                message: message.into(),
            },
        }
    }

    fn timeout(limit_ms: u128) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "Timeout",
            format!("Pairing did not finish within {limit_ms} ms"),
        )
    }

    /// Metric label for this failure
    pub fn outcome(&self) -> &str {
        &self.body.error
    }
}

impl From<PairingError> for ApiError {
    fn from(err: PairingError) -> Self {
        let status = match err {
            PairingError::AllRoundsPaired { .. } => StatusCode::CONFLICT,
            PairingError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            PairingError::InvalidResult { .. }
            | PairingError::DuplicatePlacement { .. }
            | PairingError::UnknownPlayer { .. }
            | PairingError::SelfPairing { .. }
            | PairingError::UnsolvableBracket { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Compute the next round of the posted tournament.
///
/// # Request Body
///
/// A `CalculatePairingRequest`: `{"tournament": {...}}`.
///
/// # Response
///
/// Returns `200 OK` with `{"pairing": {"tables": [...], "empty_tables": [...]}}`.
///
/// # Errors
///
/// - `400 Bad Request`: body is not a valid request
/// - `409 Conflict`: every configured round is already paired
/// - `422 Unprocessable Entity`: corrupted history or no legal pairing exists
/// - `504 Gateway Timeout`: the search exceeded the time limit
pub async fn calculate_pairing(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> Result<Json<CalculatePairingResponse>, ApiError> {
    let started = Instant::now();
    let digest = logging::payload_digest(&body);

    let request: CalculatePairingRequest = serde_json::from_slice(&body).map_err(|e| {
        metrics::pairing_requests_total("InvalidRequest");
        ApiError::new(StatusCode::BAD_REQUEST, "InvalidRequest", e.to_string())
    })?;

    let players = request.tournament.players.len();
    logging::log_pairing_request(
        request_id.as_str(),
        &digest,
        players,
        request.tournament.next_round_no(),
    );
    metrics::pairing_players(players);

    let result = run_with_deadline(&state, request).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.outcome(),
    };
    metrics::pairing_requests_total(outcome);
    metrics::pairing_duration_ms(elapsed_ms as f64);
    logging::log_pairing_outcome(request_id.as_str(), outcome, elapsed_ms);
    logging::log_performance("calculate_pairing", elapsed_ms, Some(&digest));

    result.map(Json)
}

async fn run_with_deadline(
    state: &AppState,
    request: CalculatePairingRequest,
) -> Result<CalculatePairingResponse, ApiError> {
    let engine = state.engine.clone();
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();

    let task = tokio::task::spawn_blocking(move || {
        engine.calculate_pairing_with_cancel(&request, &worker_cancel)
    });

    match tokio::time::timeout(state.pairing_timeout, task).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(join_err)) => Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal",
            join_err.to_string(),
        )),
        Err(_) => {
            // The worker stops at its next search step
            cancel.cancel();
            Err(ApiError::timeout(state.pairing_timeout.as_millis()))
        }
    }
}
