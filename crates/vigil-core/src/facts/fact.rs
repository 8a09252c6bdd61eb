use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Confidence, FactValue};
use crate::config::defaults;

/// Who established a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactSource {
    /// Written by an external detector (OS/browser sniffing).
    AutoDetection,
    /// Written by the option a user selected.
    UserAnswer,
    /// Computed from other facts by a collaborator.
    Derived,
    /// Set by hand (diagnostics panel, tests).
    Manual,
}

impl FactSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AutoDetection => "auto-detection",
            Self::UserAnswer => "user-answer",
            Self::Derived => "derived",
            Self::Manual => "manual",
        }
    }
}

/// A recorded fact. Facts are keyed uniquely; a later write replaces the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub key: String,
    pub value: FactValue,
    pub confidence: Confidence,
    pub source: FactSource,
    pub established_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub category: String,
    /// Question whose answer wrote the fact. Set only for
    /// [`FactSource::UserAnswer`] facts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_by: Option<String>,
}

impl Fact {
    /// Whether the fact must be treated as absent at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        has_expired(self.expires_at, now)
    }
}

/// Metadata accompanying a fact write.
#[derive(Debug, Clone, PartialEq)]
pub struct FactMeta {
    pub source: FactSource,
    pub confidence: Confidence,
    pub category: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl FactMeta {
    pub fn new(source: FactSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Metadata for detector output with the detector's own confidence.
    pub fn auto_detected(confidence: f64) -> Self {
        Self {
            source: FactSource::AutoDetection,
            confidence: Confidence::new(confidence),
            category: crate::constants::CATEGORY_DEVICE.to_string(),
            expires_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Confidence::new(confidence);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

impl Default for FactMeta {
    fn default() -> Self {
        Self {
            source: FactSource::Manual,
            confidence: Confidence::default(),
            category: defaults::DEFAULT_FACT_CATEGORY.to_string(),
            expires_at: None,
        }
    }
}

/// Expiry boundary shared by facts and answers.
///
/// A record is expired only once `now` is strictly past `expires_at`;
/// at the exact deadline it is still valid. Records without a deadline
/// never expire.
pub fn has_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|deadline| now > deadline)
}
