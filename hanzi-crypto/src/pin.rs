//! One-way PIN digest.

use sha2::{Digest, Sha256};

/// Hashes a PIN to 64 lowercase hex characters (SHA-256).
///
/// Deterministic and unsalted: used for local consistency checks only,
/// never as a stored credential substitute.
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}
