use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by credential loading and the GRVT client.
#[derive(Error, Debug)]
pub enum GrvtError {
    /// The credential file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A required key is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid GRVT_ENV '{0}': expected 'testnet' or 'prod'")]
    InvalidEnvironment(String),

    /// The credential file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// The exchange rejected the credentials (HTTP 401/403) or no session was issued
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Endpoint unreachable, connection reset or timed out
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success reply from the exchange
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid rate limit: {0}")]
    RateLimit(String),
}

impl GrvtError {
    /// True for failures caused by the configuration rather than the remote side.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GrvtError::MissingFile(_)
                | GrvtError::MissingField(_)
                | GrvtError::InvalidEnvironment(_)
                | GrvtError::ConfigParse(_)
                | GrvtError::InvalidEndpoint(_)
                | GrvtError::RateLimit(_)
        )
    }
}
