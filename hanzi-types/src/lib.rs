//! Shared domain types for the hanzi learning backend.
//!
//! Learning records serialize with camelCase field names, the shape
//! the confidentiality layer encrypts and the web client reads back.
//! Database row types (quota, interactions) keep snake_case to match
//! their column names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-character attempt counters for one practice mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeCounter {
    pub attempts: u32,
    pub correct: u32,
    /// RFC 3339 timestamp of the most recent attempt.
    pub last_attempt: String,
}

/// Character → counters mapping for one practice mode.
pub type PracticeLog = HashMap<String, PracticeCounter>;

/// One entry in a mistake log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeEntry {
    pub count: u32,
    pub pinyin: String,
    /// RFC 3339 timestamp of the most recent wrong answer.
    pub last_wrong: String,
}

/// Mistake log: character → entry.
pub type MistakeLog = HashMap<String, MistakeEntry>;

/// Aggregate practice statistics for one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStatistics {
    pub total_practice: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    /// RFC 3339 timestamp of the first practice session.
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
}

impl LearningStatistics {
    /// Fresh statistics for a newly provisioned user.
    pub fn starting(now: DateTime<Utc>) -> Self {
        Self {
            total_practice: 0,
            correct_count: 0,
            wrong_count: 0,
            start_date: now.to_rfc3339(),
            last_practice_date: None,
            streak_days: None,
        }
    }

    /// Records one practice outcome.
    ///
    /// The streak grows by one on the first session of a day that
    /// directly follows the previous practice day, and resets to 1
    /// after a gap.
    pub fn record(&mut self, correct: bool, now: DateTime<Utc>) {
        self.total_practice += 1;
        if correct {
            self.correct_count += 1;
        } else {
            self.wrong_count += 1;
        }

        let today = now.date_naive();
        let previous_day = self
            .last_practice_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.date_naive());
        self.streak_days = Some(match previous_day {
            Some(prev) if prev == today => self.streak_days.unwrap_or(1),
            Some(prev) if prev.succ_opt() == Some(today) => self.streak_days.unwrap_or(1) + 1,
            _ => 1,
        });
        self.last_practice_date = Some(now.to_rfc3339());
    }
}

/// The full learning record for one user: the six logical fields stored
/// (encrypted per field) in the learning_data row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningData {
    pub pinyin_practice: PracticeLog,
    pub dictation_practice: PracticeLog,
    pub sound_game: PracticeLog,
    pub mistakes_dictation: MistakeLog,
    pub mistakes_sound: MistakeLog,
    pub statistics: LearningStatistics,
}

impl LearningData {
    /// Empty record for a newly provisioned user.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            pinyin_practice: PracticeLog::new(),
            dictation_practice: PracticeLog::new(),
            sound_game: PracticeLog::new(),
            mistakes_dictation: MistakeLog::new(),
            mistakes_sound: MistakeLog::new(),
            statistics: LearningStatistics::starting(now),
        }
    }
}

/// Practice modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeKind {
    Pinyin,
    Dictation,
    Sound,
}

impl PracticeKind {
    /// Stored column name for this mode's practice log.
    pub fn column(self) -> &'static str {
        match self {
            PracticeKind::Pinyin => "pinyin_practice",
            PracticeKind::Dictation => "dictation_practice",
            PracticeKind::Sound => "sound_game",
        }
    }
}

/// Which mistake log a wrong answer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MistakeKind {
    Dictation,
    Sound,
}

impl MistakeKind {
    /// Stored column name for this mistake log.
    pub fn column(self) -> &'static str {
        match self {
            MistakeKind::Dictation => "mistakes_dictation",
            MistakeKind::Sound => "mistakes_sound",
        }
    }
}

/// Per-user per-day AI request counter row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiUsageQuota {
    pub user_id: String,
    /// Quota day (UTC).
    pub date: NaiveDate,
    pub request_count: u32,
}

/// One logged AI interaction row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiInteraction {
    pub id: String,
    pub user_id: String,
    pub interaction_type: String,
    pub input_data: serde_json::Value,
    pub ai_response: serde_json::Value,
    pub model_used: String,
    pub tokens_used: u32,
}
