//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the managed identity provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Project base URL (same project as the data store).
    pub api_base_url: String,

    /// Public API key sent as `apikey`.
    pub anon_key: String,
}

impl AuthConfig {
    /// Reads `HANZI_SUPABASE_URL` and `HANZI_SUPABASE_ANON_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("HANZI_SUPABASE_URL").unwrap_or_default(),
            anon_key: std::env::var("HANZI_SUPABASE_ANON_KEY").unwrap_or_default(),
        }
    }
}
