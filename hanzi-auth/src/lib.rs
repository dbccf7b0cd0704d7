//! PIN-based authentication for the hanzi learning backend.
//!
//! An 8-digit PIN doubles as identity material and per-user encryption
//! key. Sign-in synthesizes an internal email from the PIN and uses the
//! PIN as the provider password; an unknown PIN falls through to
//! sign-up, which also provisions the users row and the initial
//! encrypted learning record.

pub mod config;
pub mod error;
pub mod pin_auth;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use pin_auth::{AuthSession, PinAuthenticator, is_valid_pin, login_email};
