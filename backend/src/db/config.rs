//! Connection settings for the remote task backend.

use serde::{Deserialize, Serialize};
use std::env;

use super::repository::RepositoryError;

fn default_token_scheme() -> String {
    "Token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for reaching the task backend's REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL of the API, e.g. `https://kitchen.example.com/api`
    pub base_url: String,
    /// API token attached to every request
    #[serde(default)]
    pub token: Option<String>,
    /// Authorization scheme, `Token` for DRF token auth or `Bearer`
    #[serde(default = "default_token_scheme")]
    pub token_scheme: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            token_scheme: default_token_scheme(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `KITCHEN_API_URL` (required): Base URL of the task backend
    /// - `KITCHEN_API_TOKEN` (optional): API token
    /// - `KITCHEN_API_TOKEN_SCHEME` (optional, default: `Token`)
    /// - `KITCHEN_API_TIMEOUT_SECS` (optional, default: 30)
    ///
    /// # Errors
    /// Returns a configuration error if the URL is missing or the timeout is
    /// not a number.
    pub fn from_env() -> Result<Self, RepositoryError> {
        let base_url = env::var("KITCHEN_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                RepositoryError::configuration(
                    "KITCHEN_API_URL must be set for the rest repository",
                )
            })?;

        let mut config = Self::new(base_url);
        config.token = env::var("KITCHEN_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        if let Ok(scheme) = env::var("KITCHEN_API_TOKEN_SCHEME") {
            if !scheme.trim().is_empty() {
                config.token_scheme = scheme.trim().to_string();
            }
        }
        if let Ok(timeout) = env::var("KITCHEN_API_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|e| {
                RepositoryError::configuration(format!(
                    "Invalid KITCHEN_API_TIMEOUT_SECS '{}': {}",
                    timeout, e
                ))
            })?;
        }

        Ok(config)
    }

    /// Value for the `Authorization` header, if a token is configured.
    pub fn authorization(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{} {}", self.token_scheme, token))
    }
}
