//! Data store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the managed data store's REST surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL (e.g. "https://example.supabase.co").
    pub api_base_url: String,

    /// Public API key sent as `apikey` and bearer token.
    pub anon_key: String,
}

impl StoreConfig {
    /// Reads `HANZI_SUPABASE_URL` and `HANZI_SUPABASE_ANON_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("HANZI_SUPABASE_URL").unwrap_or_default(),
            anon_key: std::env::var("HANZI_SUPABASE_ANON_KEY").unwrap_or_default(),
        }
    }
}
