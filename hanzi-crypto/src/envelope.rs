//! JSON envelope encryption for learning records.
//!
//! An envelope is an opaque text string: base64 of the per-envelope
//! salt, the nonce and the ChaCha20-Poly1305 ciphertext of the UTF-8
//! JSON serialization of the record. The format is internal, stable
//! only within this implementation's own encrypt/decrypt pair.

use crate::cipher::{self, NONCE_SIZE};
use crate::error::CryptoResult;
use crate::key::{SALT_SIZE, Salt, derive_key};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encrypts a JSON-serializable record under a text key.
///
/// A fresh salt and nonce are drawn per call, so two envelopes for the
/// same input legitimately differ; only round-trip equality through
/// [`decrypt_record`] is guaranteed. Serialization failures and cipher
/// failures surface as errors; encryption is never silently lossy.
pub fn encrypt_record<T: Serialize + ?Sized>(value: &T, key: &str) -> CryptoResult<String> {
    let plaintext = serde_json::to_vec(value)?;
    let salt = Salt::random();
    let derived = derive_key(key, &salt)?;
    let (nonce, ciphertext) = cipher::encrypt(&derived, &plaintext)?;

    let mut envelope = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(salt.as_bytes());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Decrypts an envelope back into a value.
///
/// Every failure mode (malformed base64, truncated envelope, wrong
/// key, tampered ciphertext, non-JSON plaintext) collapses to `None`.
/// Callers must treat `None` as "no usable data" and substitute a
/// default; "wrong key" is not distinguishable from "corrupted data".
pub fn decrypt_record<T: DeserializeOwned>(envelope: &str, key: &str) -> Option<T> {
    let bytes = BASE64.decode(envelope.trim()).ok()?;
    if bytes.len() <= SALT_SIZE + NONCE_SIZE {
        return None;
    }
    let (salt_bytes, rest) = bytes.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(salt_bytes);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);

    let derived = derive_key(key, &Salt::from_bytes(salt)).ok()?;
    let plaintext = cipher::decrypt(&derived, &nonce, ciphertext)?;
    serde_json::from_slice(&plaintext).ok()
}
