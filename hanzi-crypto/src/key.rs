//! Key material: random salts and Argon2id-derived symmetric keys.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Derived key length in bytes (ChaCha20-Poly1305 key size).
pub const KEY_SIZE: usize = 32;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Salt mixed into key derivation so identical secrets yield different
/// keys per envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// 256-bit symmetric key derived from a text secret. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Derives a symmetric key from a text secret using Argon2id.
///
/// No constraint is imposed on the secret: an 8-digit PIN and a long
/// configured default are both valid inputs.
pub fn derive_key(secret: &str, salt: &Salt) -> CryptoResult<DerivedKey> {
    let params = Params::new(19 * 1024, 2, 1, Some(KEY_SIZE))
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(secret.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(DerivedKey(out))
}
