//! Quota-gated AI service.
//!
//! The per-user daily budget is checked before the model is called, so
//! an exhausted quota never costs a completion. Successful calls are
//! logged to ai_interactions and counted against the quota.

use crate::chat::{ChatClient, ChatMessage, ChatOutput};
use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use chrono::Utc;
use hanzi_store::QuotaStore;
use hanzi_types::AiInteraction;
use tracing::{debug, warn};
use uuid::Uuid;

/// Chat completions with per-user daily quotas.
pub struct AiService {
    chat: ChatClient,
    store: QuotaStore,
    daily_request_limit: u32,
}

impl AiService {
    pub fn new(config: AiConfig, store: QuotaStore) -> Self {
        let daily_request_limit = config.daily_request_limit;
        Self {
            chat: ChatClient::new(config),
            store,
            daily_request_limit,
        }
    }

    /// Remaining completions for the user today.
    pub async fn remaining_quota(&self, user_id: &str) -> AiResult<u32> {
        let used = self.used_today(user_id).await?;
        Ok(self.daily_request_limit.saturating_sub(used))
    }

    /// Runs one quota-gated completion for the user and records it.
    pub async fn chat(
        &self,
        user_id: &str,
        interaction_type: &str,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> AiResult<ChatOutput> {
        let used = self.used_today(user_id).await?;
        if used >= self.daily_request_limit {
            warn!("user {user_id} exhausted the daily AI quota");
            return Err(AiError::QuotaExceeded {
                used,
                limit: self.daily_request_limit,
            });
        }

        let output = self.chat.chat(messages, model).await?;
        debug!(
            "completion for user {user_id} used {} tokens",
            output.tokens_used
        );

        self.store
            .log_interaction(&AiInteraction {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                interaction_type: interaction_type.to_string(),
                input_data: serde_json::to_value(messages)?,
                ai_response: serde_json::json!({ "content": output.content }),
                model_used: output.model.clone(),
                tokens_used: output.tokens_used,
            })
            .await?;
        self.store
            .bump_quota(user_id, Utc::now().date_naive())
            .await?;

        Ok(output)
    }

    async fn used_today(&self, user_id: &str) -> AiResult<u32> {
        let today = Utc::now().date_naive();
        let used = self
            .store
            .get_quota(user_id, today)
            .await?
            .map(|q| q.request_count)
            .unwrap_or(0);
        Ok(used)
    }
}
