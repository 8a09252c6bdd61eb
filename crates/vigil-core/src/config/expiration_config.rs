//! Answer-expiration configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::facts::FactValue;

/// One extra `(question, value) → days` rule supplied by configuration.
/// Omitting `value` matches every answer to the question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationRuleConfig {
    pub question_id: String,
    #[serde(default)]
    pub value: Option<FactValue>,
    pub days: u32,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirationConfig {
    /// Days until an answer without a matching rule goes stale. Default: 90.
    pub default_days: Option<u32>,
    /// Window used by "expiring soon" reminders. Default: 14.
    pub expiring_soon_days: Option<u32>,
    /// Whether the built-in rule table applies. Default: true.
    pub use_builtin_rules: Option<bool>,
    /// Extra rules, consulted before the built-in table.
    pub rules: Vec<ExpirationRuleConfig>,
}

impl ExpirationConfig {
    pub fn effective_default_days(&self) -> u32 {
        self.default_days
            .unwrap_or(defaults::DEFAULT_EXPIRATION_DAYS)
    }

    pub fn effective_expiring_soon_days(&self) -> u32 {
        self.expiring_soon_days
            .unwrap_or(defaults::DEFAULT_EXPIRING_SOON_DAYS)
    }

    pub fn effective_use_builtin_rules(&self) -> bool {
        self.use_builtin_rules
            .unwrap_or(defaults::DEFAULT_USE_BUILTIN_RULES)
    }
}
