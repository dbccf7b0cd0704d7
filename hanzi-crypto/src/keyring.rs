//! Key resolution: explicit per-call key or a process-wide default.
//!
//! The default key comes from configuration injected at construction.
//! A production-flagged process refuses to start without a configured
//! key; outside production a known development fallback is accepted
//! with a startup warning.

use crate::envelope;
use crate::error::{CryptoError, CryptoResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Development-only fallback. Not a secret.
const DEV_FALLBACK_KEY: &str = "default-key-please-change-in-production";

/// Configuration for the confidentiality layer.
#[derive(Clone, Debug, Default)]
pub struct CryptoConfig {
    /// Process-wide default key, used when a call supplies no explicit key.
    pub default_key: Option<String>,
    /// Whether the process runs in a production-flagged environment.
    pub production: bool,
}

impl CryptoConfig {
    /// Reads configuration from the environment.
    ///
    /// `HANZI_ENCRYPTION_KEY` supplies the default key and
    /// `HANZI_ENV=production` flags the environment.
    pub fn from_env() -> Self {
        let default_key = std::env::var("HANZI_ENCRYPTION_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        let production = std::env::var("HANZI_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);
        Self {
            default_key,
            production,
        }
    }
}

/// Resolves the key for each encrypt/decrypt call.
///
/// In the primary call path the explicit key is the user's PIN, so
/// records stay confidential even against an operator with full
/// data-store access. The default key covers records not tied to a
/// single user.
pub struct Keyring {
    default_key: String,
}

impl Keyring {
    /// Builds a keyring from injected configuration.
    ///
    /// Fails with [`CryptoError::MissingDefaultKey`] when production is
    /// flagged and no key is configured. Outside production the
    /// development fallback is used; the warning is emitted once here,
    /// at startup, never mid-request.
    pub fn new(config: CryptoConfig) -> CryptoResult<Self> {
        match config.default_key {
            Some(key) => Ok(Self { default_key: key }),
            None if config.production => Err(CryptoError::MissingDefaultKey),
            None => {
                warn!("HANZI_ENCRYPTION_KEY not set, using development fallback key");
                Ok(Self {
                    default_key: DEV_FALLBACK_KEY.to_string(),
                })
            }
        }
    }

    fn resolve<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.unwrap_or(&self.default_key)
    }

    /// Encrypts a record under the explicit key, or the default when
    /// none is given.
    pub fn encrypt<T: Serialize + ?Sized>(
        &self,
        value: &T,
        key: Option<&str>,
    ) -> CryptoResult<String> {
        envelope::encrypt_record(value, self.resolve(key))
    }

    /// Decrypts an envelope. Same nullable contract as
    /// [`envelope::decrypt_record`].
    pub fn decrypt<T: DeserializeOwned>(&self, envelope: &str, key: Option<&str>) -> Option<T> {
        envelope::decrypt_record(envelope, self.resolve(key))
    }
}
