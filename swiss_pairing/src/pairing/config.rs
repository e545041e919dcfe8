//! Pairing configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::Score;

/// Default node budget of the per-bracket search
pub const DEFAULT_MAX_SEARCH_ATTEMPTS: usize = 10_000;

/// Largest colour difference a player may reach outside the final round
pub const DEFAULT_MAX_COLOUR_DIFFERENCE: u32 = 2;

/// Tunables of the pairing algorithm
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Points awarded for a pairing-bye
    pub pairing_bye_points: Score,
    /// Avoid giving a second pairing-bye to the same player
    pub track_pairing_byes: bool,
    /// Search nodes explored per bracket before giving up on a full match
    pub max_search_attempts: usize,
    /// Bound on |white games - black games|
    pub max_colour_difference: u32,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            pairing_bye_points: Score::ONE,
            track_pairing_byes: true,
            max_search_attempts: DEFAULT_MAX_SEARCH_ATTEMPTS,
            max_colour_difference: DEFAULT_MAX_COLOUR_DIFFERENCE,
        }
    }
}

impl PairingConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// - `PAIRING_BYE_POINTS`: pairing-bye value (default: 1)
    /// - `PAIRING_TRACK_BYES`: avoid repeat pairing-byes (default: true)
    /// - `PAIRING_MAX_SEARCH_ATTEMPTS`: per-bracket search budget (default: 10000)
    /// - `PAIRING_MAX_COLOUR_DIFF`: colour difference bound (default: 2)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but unparsable
    pub fn from_env() -> Result<Self, PairingConfigError> {
        let defaults = Self::default();

        let pairing_bye_points = match std::env::var("PAIRING_BYE_POINTS") {
            Ok(raw) => raw
                .parse::<f64>()
                .ok()
                .and_then(Score::from_points)
                .ok_or(PairingConfigError::Invalid {
                    var: "PAIRING_BYE_POINTS",
                    value: raw,
                })?,
            Err(_) => defaults.pairing_bye_points,
        };

        let config = Self {
            pairing_bye_points,
            track_pairing_byes: parse_env("PAIRING_TRACK_BYES", defaults.track_pairing_byes)?,
            max_search_attempts: parse_env(
                "PAIRING_MAX_SEARCH_ATTEMPTS",
                defaults.max_search_attempts,
            )?,
            max_colour_difference: parse_env(
                "PAIRING_MAX_COLOUR_DIFF",
                defaults.max_colour_difference,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the resolver cannot work with
    pub fn validate(&self) -> Result<(), PairingConfigError> {
        if self.max_search_attempts == 0 {
            return Err(PairingConfigError::Invalid {
                var: "PAIRING_MAX_SEARCH_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        if self.max_colour_difference == 0 {
            return Err(PairingConfigError::Invalid {
                var: "PAIRING_MAX_COLOUR_DIFF",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, Error, PartialEq)]
pub enum PairingConfigError {
    #[error("Invalid pairing configuration for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, PairingConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| PairingConfigError::Invalid { var: key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PairingConfig::default();
        assert_eq!(config.pairing_bye_points, Score::ONE);
        assert!(config.track_pairing_byes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = PairingConfig {
            max_search_attempts: 0,
            ..PairingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PairingConfigError::Invalid {
                var: "PAIRING_MAX_SEARCH_ATTEMPTS",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: PairingConfig =
            serde_json::from_str(r#"{"pairing_bye_points": 0.5}"#).unwrap();
        assert_eq!(config.pairing_bye_points, Score::HALF);
        assert_eq!(config.max_search_attempts, DEFAULT_MAX_SEARCH_ATTEMPTS);
    }
}
