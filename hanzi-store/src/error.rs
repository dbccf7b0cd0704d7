//! Data store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when talking to the managed data store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store API request failed: {0}")]
    Api(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] hanzi_crypto::CryptoError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
