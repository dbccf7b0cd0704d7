//! Error types for the confidentiality layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors surfaced by the encryption side of the layer.
///
/// There is deliberately no decryption variant: every decryption
/// failure collapses to a `None` return so callers substitute a default
/// value instead of distinguishing "wrong key" from "corrupted data".
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("no default encryption key configured in a production environment")]
    MissingDefaultKey,
}
