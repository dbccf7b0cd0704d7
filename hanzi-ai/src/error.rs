//! AI service error types.

use thiserror::Error;

/// Result type for AI operations.
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur in the AI service.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("daily request limit reached ({used}/{limit})")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error("model API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store error: {0}")]
    Store(#[from] hanzi_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
