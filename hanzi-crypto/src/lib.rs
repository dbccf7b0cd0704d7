//! Learning-data confidentiality layer.
//!
//! Protects user learning records at rest:
//! - Argon2id key derivation from text secrets (the user's PIN in the
//!   primary path, a configured process default otherwise)
//! - ChaCha20-Poly1305 envelope encryption of JSON-serialized records
//! - an unsalted SHA-256 PIN digest for local consistency checks
//!
//! The layer is stateless: keys are supplied per call and held only for
//! the duration of the call. An envelope is self-contained: the key
//! string that produced it is the only input needed to open it.
//!
//! Decryption never fails loudly. Wrong key, tampered ciphertext and
//! garbage input all collapse to `None`, and callers substitute an
//! empty default instead of branching on an error kind.

mod cipher;
pub mod envelope;
mod error;
mod key;
pub mod keyring;
mod pin;

pub use cipher::NONCE_SIZE;
pub use envelope::{decrypt_record, encrypt_record};
pub use error::{CryptoError, CryptoResult};
pub use key::{DerivedKey, KEY_SIZE, SALT_SIZE, Salt, derive_key};
pub use keyring::{CryptoConfig, Keyring};
pub use pin::hash_pin;
