//! ChaCha20-Poly1305 authenticated encryption over raw bytes.

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand::RngCore;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Encrypts plaintext under a derived key with a fresh random nonce.
///
/// Returns `(nonce, ciphertext)`; the ciphertext carries the Poly1305
/// tag, so tampering is detected at decryption time.
pub(crate) fn encrypt(
    key: &DerivedKey,
    plaintext: &[u8],
) -> CryptoResult<([u8; NONCE_SIZE], Vec<u8>)> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok((nonce, ciphertext))
}

/// Decrypts ciphertext. `None` means wrong key or tampered data; the
/// two cases are indistinguishable on purpose.
pub(crate) fn decrypt(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Option<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()
}
