//! Authentication error types.

use thiserror::Error;

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur during PIN authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("PIN must be exactly 8 digits")]
    InvalidPin,

    #[error("identity provider rejected the request: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store error: {0}")]
    Store(#[from] hanzi_store::StoreError),
}
