//! Service configuration, loaded from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Connection settings for the generative-language service.
///
/// The API key is an ambient credential; the crate neither rotates nor
/// persists it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Read configuration from `API_KEY` (required), `API_URL`, `MODEL`
    /// and `REQUEST_TIMEOUT_SECS` (all optional). A `.env` file is
    /// honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let api_key =
            std::env::var("API_KEY").map_err(|_| ConfigError::MissingVar("API_KEY"))?;
        let api_url =
            std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                var: "REQUEST_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            api_key,
            model,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration with defaults everywhere but the key; used by tests
    /// and by shells that manage credentials themselves.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
