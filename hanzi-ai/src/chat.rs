//! OpenAI-compatible chat completion client.

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use crate::models::DEFAULT_CHAT_MODEL;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One turn of a chat conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completed model response.
#[derive(Clone, Debug)]
pub struct ChatOutput {
    pub content: String,
    pub model: String,
    pub tokens_used: u32,
}

/// HTTP client for the completion endpoint.
pub struct ChatClient {
    client: Client,
    config: AiConfig,
}

impl ChatClient {
    pub fn new(config: AiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { client, config }
    }

    /// Runs one chat completion. `model` falls back to the default
    /// when not given.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> AiResult<ChatOutput> {
        let model = model.unwrap_or(DEFAULT_CHAT_MODEL);
        debug!("requesting completion from {model}");

        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 1024,
        });

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
            usage: Option<Usage>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: RespMessage,
        }
        #[derive(Deserialize)]
        struct RespMessage {
            content: String,
        }
        #[derive(Deserialize)]
        struct Usage {
            total_tokens: u32,
        }

        let resp: Resp = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AiError::Api(e.to_string()))?
            .json()
            .await?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::Api("completion returned no choices".to_string()))?;

        Ok(ChatOutput {
            content,
            model: model.to_string(),
            tokens_used: resp.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}
