//! Weather error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather API key is not configured")]
    NotConfigured,

    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather API returned HTTP {0}")]
    Status(u16),

    #[error("weather API error {code}: {reason}")]
    Api { code: i64, reason: String },

    #[error("unexpected weather response: {0}")]
    Decode(String),
}
