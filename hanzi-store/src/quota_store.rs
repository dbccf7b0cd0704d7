//! AI usage rows: per-day request counters and interaction logs.
//!
//! These rows carry no learning data and are stored plaintext; the
//! confidentiality layer is not involved.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use hanzi_types::{AiInteraction, AiUsageQuota};
use reqwest::{Client, Method};
use tracing::debug;

/// Client for the ai_usage_quotas and ai_interactions tables.
pub struct QuotaStore {
    client: Client,
    config: StoreConfig,
}

impl QuotaStore {
    pub fn new(config: StoreConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { client, config }
    }

    fn request(&self, method: Method, path_and_query: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{path_and_query}", self.config.api_base_url);
        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    /// Returns the quota row for one user and day, if any.
    pub async fn get_quota(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AiUsageQuota>> {
        let rows: Vec<AiUsageQuota> = self
            .request(
                Method::GET,
                &format!("ai_usage_quotas?user_id=eq.{user_id}&date=eq.{date}&select=*"),
            )
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Increments the day's request counter (creating the row on first
    /// use) and returns the new count.
    ///
    /// Read-modify-write over two requests: concurrent completions for
    /// the same user can lose an increment, so the counter is
    /// best-effort and only ever undercounts.
    pub async fn bump_quota(&self, user_id: &str, date: NaiveDate) -> StoreResult<u32> {
        let current = self
            .get_quota(user_id, date)
            .await?
            .map(|q| q.request_count)
            .unwrap_or(0);
        let next = current + 1;

        let row = AiUsageQuota {
            user_id: user_id.to_string(),
            date,
            request_count: next,
        };
        debug!("quota for user {user_id} on {date}: {next}");

        self.request(Method::POST, "ai_usage_quotas")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(next)
    }

    /// Appends one interaction row.
    pub async fn log_interaction(&self, interaction: &AiInteraction) -> StoreResult<()> {
        self.request(Method::POST, "ai_interactions")
            .header("Prefer", "return=minimal")
            .json(interaction)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(())
    }
}
