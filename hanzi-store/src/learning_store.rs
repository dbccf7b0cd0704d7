//! Learning-data row client.
//!
//! One row per user with six envelope columns (pinyin practice,
//! dictation practice, sound game, two mistake logs, statistics). The
//! PIN never reaches the store: each column holds an opaque envelope
//! produced by the confidentiality layer, and the users row holds only
//! the PIN digest.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use hanzi_crypto::{Keyring, hash_pin};
use hanzi_types::{
    LearningData, LearningStatistics, MistakeKind, MistakeLog, PracticeKind, PracticeLog,
};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Raw learning_data row: one envelope string per logical field.
#[derive(Debug, Deserialize)]
struct LearningRow {
    pinyin_practice: Option<String>,
    dictation_practice: Option<String>,
    sound_game: Option<String>,
    mistakes_dictation: Option<String>,
    mistakes_sound: Option<String>,
    statistics: Option<String>,
}

/// Row-based client for the learning_data and users tables.
pub struct LearningStore {
    client: Client,
    config: StoreConfig,
    keyring: Arc<Keyring>,
}

impl LearningStore {
    pub fn new(config: StoreConfig, keyring: Arc<Keyring>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            config,
            keyring,
        }
    }

    fn request(&self, method: Method, path_and_query: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{path_and_query}", self.config.api_base_url);
        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, path_and_query: &str) -> StoreResult<Vec<T>> {
        let rows = self
            .request(Method::GET, path_and_query)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?
            .json()
            .await?;
        Ok(rows)
    }

    async fn patch_row(&self, user_id: &str, body: &Value) -> StoreResult<()> {
        debug!("updating learning_data for user {user_id}");
        self.request(Method::PATCH, &format!("learning_data?user_id=eq.{user_id}"))
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(())
    }

    fn decrypt_or_default<T: DeserializeOwned + Default>(
        &self,
        raw: &Option<String>,
        pin: &str,
    ) -> T {
        raw.as_deref()
            .and_then(|envelope| self.keyring.decrypt(envelope, Some(pin)))
            .unwrap_or_default()
    }

    /// Creates the learning_data row for a newly provisioned user, all
    /// six fields encrypted under the PIN. Returns the plaintext record.
    pub async fn create_initial(&self, user_id: &str, pin: &str) -> StoreResult<LearningData> {
        let data = LearningData::initial(Utc::now());

        let body = serde_json::json!({
            "user_id": user_id,
            "pinyin_practice": self.keyring.encrypt(&data.pinyin_practice, Some(pin))?,
            "dictation_practice": self.keyring.encrypt(&data.dictation_practice, Some(pin))?,
            "sound_game": self.keyring.encrypt(&data.sound_game, Some(pin))?,
            "mistakes_dictation": self.keyring.encrypt(&data.mistakes_dictation, Some(pin))?,
            "mistakes_sound": self.keyring.encrypt(&data.mistakes_sound, Some(pin))?,
            "statistics": self.keyring.encrypt(&data.statistics, Some(pin))?,
        });

        self.request(Method::POST, "learning_data")
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(data)
    }

    /// Writes the full learning record, one envelope per field.
    ///
    /// Encryption failures abort the write before anything is sent.
    pub async fn save(&self, user_id: &str, pin: &str, data: &LearningData) -> StoreResult<()> {
        let body = serde_json::json!({
            "pinyin_practice": self.keyring.encrypt(&data.pinyin_practice, Some(pin))?,
            "dictation_practice": self.keyring.encrypt(&data.dictation_practice, Some(pin))?,
            "sound_game": self.keyring.encrypt(&data.sound_game, Some(pin))?,
            "mistakes_dictation": self.keyring.encrypt(&data.mistakes_dictation, Some(pin))?,
            "mistakes_sound": self.keyring.encrypt(&data.mistakes_sound, Some(pin))?,
            "statistics": self.keyring.encrypt(&data.statistics, Some(pin))?,
            "updated_at": Utc::now().to_rfc3339(),
        });
        self.patch_row(user_id, &body).await
    }

    /// Reads the full learning record, decrypting per field.
    ///
    /// Fields that fail to decrypt (missing, corrupted, or a wrong PIN)
    /// come back as their empty defaults; statistics fall back to a
    /// fresh starting record.
    pub async fn load(&self, user_id: &str, pin: &str) -> StoreResult<LearningData> {
        let rows: Vec<LearningRow> = self
            .fetch_rows(&format!("learning_data?user_id=eq.{user_id}&select=*"))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("learning_data for user {user_id}")))?;

        Ok(LearningData {
            pinyin_practice: self.decrypt_or_default(&row.pinyin_practice, pin),
            dictation_practice: self.decrypt_or_default(&row.dictation_practice, pin),
            sound_game: self.decrypt_or_default(&row.sound_game, pin),
            mistakes_dictation: self.decrypt_or_default(&row.mistakes_dictation, pin),
            mistakes_sound: self.decrypt_or_default(&row.mistakes_sound, pin),
            statistics: row
                .statistics
                .as_deref()
                .and_then(|envelope| self.keyring.decrypt(envelope, Some(pin)))
                .unwrap_or_else(|| LearningStatistics::starting(Utc::now())),
        })
    }

    /// Adds one attempt to the selected practice log.
    ///
    /// Decrypt-modify-encrypt under the PIN, same shape as
    /// [`record_mistake`](Self::record_mistake).
    pub async fn record_practice(
        &self,
        user_id: &str,
        pin: &str,
        kind: PracticeKind,
        character: &str,
        correct: bool,
    ) -> StoreResult<()> {
        let column = kind.column();
        let rows: Vec<Value> = self
            .fetch_rows(&format!(
                "learning_data?user_id=eq.{user_id}&select={column}"
            ))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("learning_data for user {user_id}")))?;

        let mut log: PracticeLog = row
            .get(column)
            .and_then(|v| v.as_str())
            .and_then(|envelope| self.keyring.decrypt(envelope, Some(pin)))
            .unwrap_or_default();

        let counter = log.entry(character.to_string()).or_default();
        counter.attempts += 1;
        if correct {
            counter.correct += 1;
        }
        counter.last_attempt = Utc::now().to_rfc3339();

        let mut body = serde_json::Map::new();
        body.insert(
            column.to_string(),
            Value::String(self.keyring.encrypt(&log, Some(pin))?),
        );
        body.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.patch_row(user_id, &Value::Object(body)).await
    }

    /// Adds one wrong answer to the selected mistake log.
    ///
    /// Decrypt-modify-encrypt under the PIN: the stored column is
    /// always an envelope, never plaintext.
    pub async fn record_mistake(
        &self,
        user_id: &str,
        pin: &str,
        kind: MistakeKind,
        character: &str,
        pinyin: &str,
    ) -> StoreResult<()> {
        let column = kind.column();
        let rows: Vec<Value> = self
            .fetch_rows(&format!(
                "learning_data?user_id=eq.{user_id}&select={column}"
            ))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("learning_data for user {user_id}")))?;

        let mut mistakes: MistakeLog = row
            .get(column)
            .and_then(|v| v.as_str())
            .and_then(|envelope| self.keyring.decrypt(envelope, Some(pin)))
            .unwrap_or_default();

        let now = Utc::now().to_rfc3339();
        let entry = mistakes
            .entry(character.to_string())
            .or_insert_with(|| hanzi_types::MistakeEntry {
                count: 0,
                pinyin: pinyin.to_string(),
                last_wrong: now.clone(),
            });
        entry.count += 1;
        entry.pinyin = pinyin.to_string();
        entry.last_wrong = now;

        let mut body = serde_json::Map::new();
        body.insert(
            column.to_string(),
            Value::String(self.keyring.encrypt(&mistakes, Some(pin))?),
        );
        body.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.patch_row(user_id, &Value::Object(body)).await
    }

    /// Records one practice outcome in the aggregate statistics and
    /// returns the updated values.
    pub async fn update_statistics(
        &self,
        user_id: &str,
        pin: &str,
        correct: bool,
    ) -> StoreResult<LearningStatistics> {
        let rows: Vec<Value> = self
            .fetch_rows(&format!(
                "learning_data?user_id=eq.{user_id}&select=statistics"
            ))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("learning_data for user {user_id}")))?;

        let now = Utc::now();
        let mut stats: LearningStatistics = row
            .get("statistics")
            .and_then(|v| v.as_str())
            .and_then(|envelope| self.keyring.decrypt(envelope, Some(pin)))
            .unwrap_or_else(|| LearningStatistics::starting(now));
        stats.record(correct, now);

        let body = serde_json::json!({
            "statistics": self.keyring.encrypt(&stats, Some(pin))?,
            "updated_at": now.to_rfc3339(),
        });
        self.patch_row(user_id, &body).await?;
        Ok(stats)
    }

    /// Upserts the users row. Stores the PIN digest for consistency
    /// checks; the raw PIN is never persisted.
    pub async fn ensure_user(
        &self,
        user_id: &str,
        email: Option<&str>,
        pin: &str,
    ) -> StoreResult<()> {
        let body = serde_json::json!({
            "id": user_id,
            "email": email,
            "pin_digest": hash_pin(pin),
        });

        self.request(Method::POST, "users")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| StoreError::Api(e.to_string()))?;
        Ok(())
    }
}
