use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::fetcher::{DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::scoring::{DEFAULT_REVIEW_VOTE_WEIGHT, ScoringConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for talking to the ratings service. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingsConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub review_vote_weight: f64,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            batch_size: DEFAULT_BATCH_SIZE,
            review_vote_weight: DEFAULT_REVIEW_VOTE_WEIGHT,
        }
    }
}

impl RatingsConfig {
    /// Load a JSON config file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if !self.review_vote_weight.is_finite() || self.review_vote_weight < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "review_vote_weight must be a non-negative number, got {}",
                self.review_vote_weight
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig::new(self.review_vote_weight)
    }
}
