//! AI provider configuration.

use serde::{Deserialize, Serialize};

/// Completions per user per day before new requests are refused.
pub const DAILY_REQUEST_LIMIT: u32 = 100;

const DEFAULT_API_BASE_URL: &str = "https://api.siliconflow.cn/v1";

/// Configuration for the chat completion provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenAI-compatible API base, without a trailing slash.
    pub api_base_url: String,

    pub api_key: String,

    /// Per-user daily completion budget.
    pub daily_request_limit: u32,
}

impl AiConfig {
    /// Reads `SILICONFLOW_API_KEY`; base URL and limit use the
    /// built-in defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: std::env::var("SILICONFLOW_API_KEY").unwrap_or_default(),
            daily_request_limit: DAILY_REQUEST_LIMIT,
        }
    }
}
