//! HTTP API client for the pairing server.

use anyhow::{Context, Result};
use serde::Deserialize;
use swiss_pairing::{
    CalculatePairingRequest, CalculatePairingResponse, Pairing, PairingEngine, Tournament,
};

/// API client for communicating with the pairing server
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Ask the server to pair the next round of `tournament`
    pub async fn calculate_pairing(&self, tournament: &Tournament) -> Result<Pairing> {
        let request = CalculatePairingRequest {
            tournament: tournament.clone(),
        };

        let response = self
            .client
            .post(format!("{}/api/v1/pairing", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send pairing request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(err) => anyhow::bail!("Pairing failed ({}): {}: {}", status, err.error, err.message),
                Err(_) => anyhow::bail!("Pairing failed ({}): {}", status, error_text),
            }
        }

        let body: CalculatePairingResponse = response
            .json()
            .await
            .context("Failed to parse pairing response")?;
        Ok(body.pairing)
    }
}

/// Where pairings are computed
pub enum Pairer {
    /// In this process
    Local(PairingEngine),
    /// On a pairing server
    Remote(ApiClient),
}

impl Pairer {
    pub async fn pair(&self, tournament: &Tournament) -> Result<Pairing> {
        match self {
            Pairer::Local(engine) => {
                let request = CalculatePairingRequest {
                    tournament: tournament.clone(),
                };
                let response = engine
                    .calculate_pairing(&request)
                    .context("Failed to calculate pairing")?;
                Ok(response.pairing)
            }
            Pairer::Remote(client) => client.calculate_pairing(tournament).await,
        }
    }
}
