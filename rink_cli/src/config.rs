//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use rink_engine::service::EngineConfig;
use rink_engine::tournament::{ScoringMode, ValidationError};
use std::path::PathBuf;

/// Default directory for tournament files
pub const DEFAULT_DATA_DIR: &str = "rink-data";

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding one JSON file per tournament
    pub data_dir: PathBuf,
    /// Scoring mode for `rink new` when `--mode` is not given
    pub default_mode: ScoringMode,
    /// Engine configuration
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `data_dir_override` - Optional data directory (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<CliConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if the rink pool variables describe an empty pool
    pub fn from_env(data_dir_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir_override.unwrap_or_else(|| parse_env_or("RINK_DATA_DIR", PathBuf::from(DEFAULT_DATA_DIR)));
        let default_mode = parse_env_or("RINK_SCORING_MODE", ScoringMode::Standard);

        let engine = EngineConfig::from_env().map_err(|e| match e {
            ValidationError::EmptyResourcePool => ConfigError::Invalid {
                var: "RINK_ZONES / RINK_RINKS_PER_ZONE".to_string(),
                reason: "Need at least one green letter and one rink per green".to_string(),
            },
            other => ConfigError::Invalid {
                var: "RINK_ZONES".to_string(),
                reason: other.to_string(),
            },
        })?;

        Ok(CliConfig {
            data_dir,
            default_mode,
            engine,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.pairing.max_search_steps == 0 {
            return Err(ConfigError::Invalid {
                var: "RINK_MAX_PAIRING_STEPS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.engine.retry.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "RINK_STORE_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "RINK_DATA_DIR".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
