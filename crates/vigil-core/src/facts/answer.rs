use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fact::has_expired;
use super::AnswerValue;

/// A user's answer to one question. Re-answering overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
    pub timestamp: DateTime<Utc>,
    pub points_earned: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Answer {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        has_expired(self.expires_at, now)
    }
}
