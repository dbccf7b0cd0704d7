//! Persistence collaborator for the hanzi learning backend.
//!
//! A thin row-based client over the managed store's REST surface. Every
//! learning_data write encrypts each logical field under the user's PIN
//! before it leaves the process; every read decrypts per field and
//! substitutes an empty default when decryption yields nothing, so a
//! wrong PIN reads as "no data" rather than an error.

pub mod config;
pub mod error;
pub mod learning_store;
pub mod quota_store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use learning_store::LearningStore;
pub use quota_store::QuotaStore;
