//! FactsStore: the single owner of facts and answers for one session.

use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use vigil_core::errors::FactsError;
use vigil_core::facts::{has_expired, Answer, Fact, FactMeta, FactValue, StoreSnapshot};
use vigil_core::EvaluationContext;

use crate::derive::AnswerRecord;

/// Facts keyed by fact key, answers keyed by question ID.
///
/// Writes are last-write-wins. Reads that take `now` treat expired entries
/// as absent; reads without `now` see everything, including expired
/// entries. Expiry never deletes anything unless
/// [`clear_expired_facts`](Self::clear_expired_facts) is called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactsStore {
    facts: BTreeMap<String, Fact>,
    answers: BTreeMap<String, Answer>,
}

impl FactsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── facts ────────────────────────────────────────────────────────────

    /// Record a fact, replacing any previous fact under the same key.
    pub fn inject_fact(
        &mut self,
        key: &str,
        value: FactValue,
        meta: FactMeta,
        now: DateTime<Utc>,
    ) -> Result<(), FactsError> {
        validate_fact(key, &value)?;
        tracing::debug!(
            key,
            value = %value,
            source = meta.source.as_str(),
            confidence = meta.confidence.value(),
            "fact injected"
        );
        self.facts.insert(
            key.to_string(),
            Fact {
                key: key.to_string(),
                value,
                confidence: meta.confidence,
                source: meta.source,
                established_at: now,
                expires_at: meta.expires_at,
                category: meta.category,
                answered_by: None,
            },
        );
        Ok(())
    }

    /// The stored fact, expired or not.
    pub fn get_fact(&self, key: &str) -> Option<&Fact> {
        self.facts.get(key)
    }

    pub fn get_facts(&self) -> &BTreeMap<String, Fact> {
        &self.facts
    }

    /// Whether the stored fact equals `value`. Ignores expiration.
    pub fn has_fact_value(&self, key: &str, value: &FactValue) -> bool {
        self.facts.get(key).is_some_and(|f| &f.value == value)
    }

    /// Whether a fact exists and has not expired at `now`.
    pub fn is_fact_active(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.facts.get(key).is_some_and(|f| !f.is_expired(now))
    }

    pub fn clear_fact(&mut self, key: &str) -> Option<Fact> {
        self.facts.remove(key)
    }

    /// Drop every fact expired at `now`. Returns the removed keys.
    pub fn clear_expired_facts(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let expired: Vec<String> = self
            .facts
            .values()
            .filter(|f| f.is_expired(now))
            .map(|f| f.key.clone())
            .collect();
        for key in &expired {
            self.facts.remove(key);
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "cleared expired facts");
        }
        expired
    }

    // ── answers ──────────────────────────────────────────────────────────

    /// Commit an answer and its derived facts in one step.
    ///
    /// The record is validated before anything is written, so a rejected
    /// record leaves the store untouched and no reader ever observes the
    /// answer without its facts. Facts the question's previous answer wrote
    /// and the new one does not are withdrawn in the same step; a key some
    /// other writer has since overwritten is left alone.
    pub fn record_answer(&mut self, record: AnswerRecord) -> Result<(), FactsError> {
        for fact in &record.facts {
            validate_fact(&fact.key, &fact.value)?;
        }
        if record.answer.question_id.is_empty() {
            return Err(FactsError::InvalidAnswer {
                question_id: String::new(),
                reason: "empty question ID".to_string(),
            });
        }

        let AnswerRecord { answer, facts } = record;
        let stale: Vec<String> = self
            .facts
            .values()
            .filter(|f| f.answered_by.as_deref() == Some(answer.question_id.as_str()))
            .filter(|f| !facts.iter().any(|new| new.key == f.key))
            .map(|f| f.key.clone())
            .collect();
        for key in &stale {
            self.facts.remove(key);
        }
        tracing::debug!(
            question_id = %answer.question_id,
            value = %answer.value,
            points = answer.points_earned,
            facts = facts.len(),
            withdrawn = stale.len(),
            "answer recorded"
        );
        for fact in facts {
            self.facts.insert(fact.key.clone(), fact);
        }
        self.answers.insert(answer.question_id.clone(), answer);
        Ok(())
    }

    /// The stored answer, expired or not.
    pub fn get_answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    /// Whether an answer exists and has not expired at `now`.
    pub fn is_answered(&self, question_id: &str, now: DateTime<Utc>) -> bool {
        self.answers
            .get(question_id)
            .is_some_and(|a| !a.is_expired(now))
    }

    /// Drop all facts and answers.
    pub fn reset(&mut self) {
        self.facts.clear();
        self.answers.clear();
        tracing::debug!("facts store reset");
    }

    // ── expiration queries ───────────────────────────────────────────────

    /// Whether the answer to `question_id` is expired at `now`.
    /// Unanswered questions are not expired.
    pub fn is_answer_expired(&self, question_id: &str, now: DateTime<Utc>) -> bool {
        self.answers
            .get(question_id)
            .is_some_and(|a| a.is_expired(now))
    }

    /// Answers still valid at `now` that expire within `within`, soonest
    /// first.
    pub fn get_expiring_answers(&self, within: StdDuration, now: DateTime<Utc>) -> Vec<&Answer> {
        let horizon = Duration::from_std(within)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut expiring: Vec<&Answer> = self
            .answers
            .values()
            .filter(|a| !a.is_expired(now))
            .filter(|a| a.expires_at.is_some_and(|d| d <= horizon))
            .collect();
        expiring.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.question_id.cmp(&b.question_id))
        });
        expiring
    }

    /// Answers expired at `now`, longest-expired first.
    pub fn get_expired_answers(&self, now: DateTime<Utc>) -> Vec<&Answer> {
        let mut expired: Vec<&Answer> = self
            .answers
            .values()
            .filter(|a| a.is_expired(now))
            .collect();
        expired.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.question_id.cmp(&b.question_id))
        });
        expired
    }

    // ── views ────────────────────────────────────────────────────────────

    /// The flat context gates are evaluated against at `now`.
    ///
    /// Facts go in first and answers overwrite them, so a question answered
    /// directly wins over a fact sharing its key. Expired entries are left
    /// out.
    pub fn context_at(&self, now: DateTime<Utc>) -> EvaluationContext {
        let facts = self
            .facts
            .values()
            .filter(|f| !has_expired(f.expires_at, now))
            .map(|f| (f.key.as_str(), f.value.clone()));
        let answers = self
            .answers
            .values()
            .filter(|a| !has_expired(a.expires_at, now))
            .map(|a| (a.question_id.as_str(), a.value.clone()));
        facts.chain(answers).collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            answers: self.answers.clone(),
            facts: self.facts.clone(),
        }
    }

    /// Replace the whole store with a snapshot.
    ///
    /// Entries whose map key disagrees with their own ID are rejected and
    /// the store is left as it was.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> Result<(), FactsError> {
        if let Some((key, fact)) = snapshot.facts.iter().find(|(k, f)| **k != f.key) {
            return Err(FactsError::InvalidFact {
                key: key.clone(),
                reason: format!("snapshot entry holds fact {:?}", fact.key),
            });
        }
        if let Some((key, answer)) = snapshot
            .answers
            .iter()
            .find(|(k, a)| **k != a.question_id)
        {
            return Err(FactsError::InvalidAnswer {
                question_id: key.clone(),
                reason: format!("snapshot entry holds answer to {:?}", answer.question_id),
            });
        }
        tracing::debug!(
            answers = snapshot.answers.len(),
            facts = snapshot.facts.len(),
            "facts store restored"
        );
        self.answers = snapshot.answers;
        self.facts = snapshot.facts;
        Ok(())
    }
}

fn validate_fact(key: &str, value: &FactValue) -> Result<(), FactsError> {
    if key.trim().is_empty() {
        return Err(FactsError::InvalidFact {
            key: key.to_string(),
            reason: "empty key".to_string(),
        });
    }
    if matches!(value, FactValue::Num(n) if !n.is_finite()) {
        return Err(FactsError::InvalidFact {
            key: key.to_string(),
            reason: "number is not finite".to_string(),
        });
    }
    Ok(())
}
