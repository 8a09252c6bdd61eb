//! Answer expiration: a static rule table mapping `(question, value)` to a
//! freshness window in days, plus formatting for reminder surfaces.
//!
//! Riskier answers get short windows so the user is re-asked soon
//! (unencrypted home WiFi: 1 day); strong practices get long ones
//! (password manager in use: 180 days). Anything unmatched uses the
//! default window (90 days unless configured).
//!
//! No timers: expiry is always a pure function of `now`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use vigil_core::config::{ExpirationConfig, ExpirationRuleConfig};
use vigil_core::facts::{AnswerValue, FactValue};

/// Reason attached to answers that matched no rule.
pub const DEFAULT_REASON: &str = "Periodic review of security practices";

/// One `(question, value?) → days` rule. `value: None` matches any answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpirationRule {
    pub question_id: String,
    pub value: Option<FactValue>,
    pub days: u32,
    pub reason: String,
}

impl ExpirationRule {
    pub fn new(
        question_id: impl Into<String>,
        value: Option<FactValue>,
        days: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            value,
            days,
            reason: reason.into(),
        }
    }

    /// Whether this rule applies to an answer. A string rule value matches
    /// a multi-select answer that includes it.
    pub fn matches(&self, question_id: &str, answer: &AnswerValue) -> bool {
        if self.question_id != question_id {
            return false;
        }
        match (&self.value, answer) {
            (None, _) => true,
            (Some(FactValue::Str(wanted)), AnswerValue::StrArray(selected)) => {
                selected.iter().any(|s| s == wanted)
            }
            (Some(wanted), answer) => wanted == answer,
        }
    }
}

impl From<&ExpirationRuleConfig> for ExpirationRule {
    fn from(config: &ExpirationRuleConfig) -> Self {
        Self {
            question_id: config.question_id.clone(),
            value: config.value.clone(),
            days: config.days,
            reason: config
                .reason
                .clone()
                .unwrap_or_else(|| DEFAULT_REASON.to_string()),
        }
    }
}

/// When an answer goes stale, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    pub expires_at: DateTime<Utc>,
    pub reason: String,
    pub days: u32,
}

/// Ordered rule table. The first matching rule wins; configured rules are
/// consulted before the built-in ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpirationPolicy {
    rules: Vec<ExpirationRule>,
    default_days: u32,
}

impl ExpirationPolicy {
    /// Built-in rules with the compiled default window.
    pub fn new() -> Self {
        Self::from_config(&ExpirationConfig::default())
    }

    /// A policy with no rules at all; every answer gets `default_days`.
    pub fn flat(default_days: u32) -> Self {
        Self {
            rules: Vec::new(),
            default_days,
        }
    }

    pub fn from_config(config: &ExpirationConfig) -> Self {
        let mut rules: Vec<ExpirationRule> =
            config.rules.iter().map(ExpirationRule::from).collect();
        if config.effective_use_builtin_rules() {
            rules.extend(builtin_rules());
        }
        Self {
            rules,
            default_days: config.effective_default_days(),
        }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: ExpirationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ExpirationRule] {
        &self.rules
    }

    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    /// Compute the expiry of an answer given at `now`. A window reaching
    /// past the representable range is clamped to the latest instant.
    pub fn calculate_answer_expiration(
        &self,
        question_id: &str,
        value: &AnswerValue,
        now: DateTime<Utc>,
    ) -> Expiration {
        let (days, reason) = self
            .rules
            .iter()
            .find(|rule| rule.matches(question_id, value))
            .map(|rule| (rule.days, rule.reason.clone()))
            .unwrap_or_else(|| (self.default_days, DEFAULT_REASON.to_string()));

        Expiration {
            expires_at: now
                .checked_add_signed(Duration::days(i64::from(days)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            reason,
            days,
        }
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in rule table, highest risk first.
pub fn builtin_rules() -> Vec<ExpirationRule> {
    const STRONG: &str = "Strong practice; check in twice a year";
    let rule = |question_id: &str, value: &str, days: u32, reason: &str| {
        ExpirationRule::new(question_id, Some(FactValue::from(value)), days, reason)
    };
    vec![
        rule("wifi_encryption", "none", 1, "Unencrypted WiFi needs immediate attention"),
        rule("wifi_encryption", "wep", 7, "WEP encryption is easily broken"),
        rule("os_updates", "never", 7, "Unpatched systems are actively exploited"),
        rule("backup_frequency", "never", 14, "Data without backups is at risk"),
        rule("password_reuse", "yes", 14, "Reused passwords spread breaches"),
        rule("two_factor_auth", "none", 30, "Accounts without 2FA are easy targets"),
        rule("router_admin", "default", 30, "Default router credentials are public"),
        rule("password_manager", "yes", 180, STRONG),
        rule("two_factor_auth", "all", 180, STRONG),
        rule("os_updates", "automatic", 180, STRONG),
        rule("backup_frequency", "automatic", 180, STRONG),
    ]
}

/// Human-readable expiry for reminder surfaces.
///
/// Calendar-day based: "Expires today", "Expires tomorrow",
/// "Expires in N days" up to [`RELATIVE_WINDOW_DAYS`], then an absolute
/// date. Past deadlines read "Expired on ...".
pub fn format_expiration_date(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(deadline) = expires_at else {
        return "Never expires".to_string();
    };
    if now > deadline {
        return format!("Expired on {}", deadline.format(DATE_FORMAT));
    }
    match (deadline.date_naive() - now.date_naive()).num_days() {
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        n if n <= RELATIVE_WINDOW_DAYS => format!("Expires in {n} days"),
        _ => format!("Expires on {}", deadline.format(DATE_FORMAT)),
    }
}

/// Longest distance still phrased relatively.
pub const RELATIVE_WINDOW_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%b %-d, %Y";
