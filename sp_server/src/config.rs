//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};
use swiss_pairing::{PairingConfig, pairing::PairingConfigError};

/// Default bind address of the pairing API
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 23239);

/// Default wall-clock limit of one pairing computation
pub const DEFAULT_PAIRING_TIMEOUT_MS: u64 = 5000;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Time budget for a single `CalculatePairing` request
    pub pairing_timeout_ms: u64,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Pairing engine tunables
    pub pairing: PairingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `timeout_override` - Optional pairing timeout override in milliseconds (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        timeout_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let pairing_timeout_ms = match timeout_override {
            Some(ms) => ms,
            None => parse_env("PAIRING_TIMEOUT_MS")?.unwrap_or(DEFAULT_PAIRING_TIMEOUT_MS),
        };

        let metrics_bind = parse_env("METRICS_BIND")?;

        let config = ServerConfig {
            bind,
            pairing_timeout_ms,
            metrics_bind,
            pairing: PairingConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairing_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "PAIRING_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server address ({})", self.bind),
            });
        }

        self.pairing.validate()?;
        Ok(())
    }

    pub fn pairing_timeout(&self) -> Duration {
        Duration::from_millis(self.pairing_timeout_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Pairing(#[from] PairingConfigError),
}

/// Parse an environment variable; `None` when unset or blank
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: format!("cannot parse '{raw}'"),
                })
        }
        _ => Ok(None),
    }
}
