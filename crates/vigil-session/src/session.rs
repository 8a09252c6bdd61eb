//! AssessmentSession: the single mutator of one user's facts and answers.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use vigil_core::errors::{FactsError, VigilResult};
use vigil_core::facts::{Answer, AnswerValue, FactMeta, FactValue, StoreSnapshot};
use vigil_core::traits::{IClock, ISnapshotStore, SystemClock};
use vigil_core::{EvaluationContext, QuestionBank, Suite, VigilConfig};
use vigil_facts::{
    derive_answer, format_expiration_date, Expiration, ExpirationPolicy, FactsStore,
    JsonFileSnapshotStore,
};
use vigil_visibility::{lint_bank, LintReport, VisibilityResolver, VisibilityResult};

/// An assessment in progress.
///
/// Visibility is never cached: every query rebuilds the context from the
/// store at the clock's current instant, so expiry takes effect without
/// any timer.
pub struct AssessmentSession {
    bank: QuestionBank,
    store: FactsStore,
    clock: Arc<dyn IClock>,
    policy: ExpirationPolicy,
    resolver: VisibilityResolver,
    config: VigilConfig,
    lint: LintReport,
}

impl AssessmentSession {
    /// Session with default configuration and the system clock.
    pub fn new(bank: QuestionBank) -> VigilResult<Self> {
        Self::with_config(bank, VigilConfig::default(), Arc::new(SystemClock))
    }

    /// Session with explicit configuration and time source.
    ///
    /// With `session.validate_on_load` (the default) the bank is linted
    /// first and any lint error rejects it.
    pub fn with_config(
        bank: QuestionBank,
        config: VigilConfig,
        clock: Arc<dyn IClock>,
    ) -> VigilResult<Self> {
        let lint = if config.session.effective_validate_on_load() {
            lint_bank(&bank, &config.visibility).into_result()?
        } else {
            LintReport::default()
        };
        let policy = ExpirationPolicy::from_config(&config.expiration);

        tracing::info!(
            questions = bank.len(),
            suites = bank.suites().len(),
            lint_warnings = lint.warnings().count(),
            "assessment session created"
        );

        Ok(Self {
            bank,
            store: FactsStore::new(),
            clock,
            policy,
            resolver: VisibilityResolver::new(),
            config,
            lint,
        })
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &FactsStore {
        &self.store
    }

    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    pub fn policy(&self) -> &ExpirationPolicy {
        &self.policy
    }

    /// Warnings found when the bank was linted on creation.
    pub fn lint_report(&self) -> &LintReport {
        &self.lint
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── writes ───────────────────────────────────────────────────────────

    /// Record an answer and the facts its selected options establish.
    ///
    /// Nothing is written if the question or option is unknown. Returns the
    /// expiry computed for the answer.
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        value: impl Into<AnswerValue>,
    ) -> VigilResult<Expiration> {
        let question = self
            .bank
            .question(question_id)
            .ok_or_else(|| FactsError::UnknownQuestion {
                question_id: question_id.to_string(),
            })?;

        let now = self.clock.now();
        let value = value.into();
        let expiration = self.policy.calculate_answer_expiration(question_id, &value, now);
        let record = derive_answer(
            question,
            value,
            now,
            Some(expiration.expires_at),
            &self.config.facts,
        )?;
        self.store.record_answer(record)?;

        tracing::debug!(question_id, days = expiration.days, "answer submitted");
        Ok(expiration)
    }

    /// Record a fact from an external producer (detectors, diagnostics).
    pub fn inject_fact(
        &mut self,
        key: &str,
        value: impl Into<FactValue>,
        meta: FactMeta,
    ) -> VigilResult<()> {
        let now = self.clock.now();
        self.store.inject_fact(key, value.into(), meta, now)?;
        Ok(())
    }

    /// Drop facts that have expired. Returns the removed keys.
    pub fn clear_expired_facts(&mut self) -> Vec<String> {
        let now = self.clock.now();
        self.store.clear_expired_facts(now)
    }

    /// Forget every answer and fact.
    pub fn reset(&mut self) {
        self.store.reset();
        tracing::info!("assessment session reset");
    }

    // ── visibility ───────────────────────────────────────────────────────

    /// The context gates see right now.
    pub fn context(&self) -> EvaluationContext {
        self.store.context_at(self.clock.now())
    }

    pub fn visibility(&self) -> VisibilityResult {
        self.resolver.resolve(&self.bank, &self.context())
    }

    /// Visible questions to present next, in order. Unless
    /// `visibility.hide_answered` is off, questions with a current answer
    /// are left out; an expired answer puts its question back.
    pub fn pending_questions(&self) -> Vec<String> {
        let now = self.clock.now();
        let result = self.visibility();
        if !self.config.visibility.effective_hide_answered() {
            return result.visible_question_ids;
        }
        let pending: Vec<String> = result
            .pending(|id| self.store.is_answered(id, now))
            .into_iter()
            .map(str::to_string)
            .collect();
        pending
    }

    /// Unlocked suites, highest suite priority first.
    pub fn unlocked_suites(&self) -> Vec<&Suite> {
        let result = self.visibility();
        self.resolver.ordered_suites(&self.bank, &result)
    }

    // ── expiration ───────────────────────────────────────────────────────

    pub fn expiring_answers(&self, within: StdDuration) -> Vec<&Answer> {
        self.store.get_expiring_answers(within, self.clock.now())
    }

    /// Answers expiring within the configured reminder window.
    pub fn expiring_soon(&self) -> Vec<&Answer> {
        let days = u64::from(self.config.expiration.effective_expiring_soon_days());
        self.expiring_answers(StdDuration::from_secs(days * vigil_core::constants::SECONDS_PER_DAY))
    }

    pub fn expired_answers(&self) -> Vec<&Answer> {
        self.store.get_expired_answers(self.clock.now())
    }

    pub fn is_answer_expired(&self, question_id: &str) -> bool {
        self.store.is_answer_expired(question_id, self.clock.now())
    }

    /// Reminder text for an answer's expiry, `None` when unanswered.
    pub fn expiration_label(&self, question_id: &str) -> Option<String> {
        let answer = self.store.get_answer(question_id)?;
        Some(format_expiration_date(answer.expires_at, self.clock.now()))
    }

    // ── persistence ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Replace the session's state. Answers to questions the bank no longer
    /// defines are kept but logged.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> VigilResult<()> {
        for question_id in snapshot.answers.keys() {
            if self.bank.question(question_id).is_none() {
                tracing::warn!(question_id = %question_id, "restored answer for unknown question");
            }
        }
        self.store.restore(snapshot)?;
        Ok(())
    }

    pub fn save_to(&self, store: &dyn ISnapshotStore) -> VigilResult<()> {
        store.save(&self.store.snapshot())?;
        Ok(())
    }

    /// Restore from a snapshot store. Returns `false` and leaves the
    /// session untouched when the store holds nothing.
    pub fn load_from(&mut self, store: &dyn ISnapshotStore) -> VigilResult<bool> {
        match store.load()? {
            Some(snapshot) => {
                self.restore(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The JSON snapshot store at `session.snapshot_path`, if configured.
    pub fn configured_snapshot_store(&self) -> Option<JsonFileSnapshotStore> {
        self.config
            .session
            .snapshot_path
            .as_deref()
            .map(JsonFileSnapshotStore::new)
    }
}

impl std::fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("questions", &self.bank.len())
            .field("answers", &self.store.answers().len())
            .field("facts", &self.store.get_facts().len())
            .finish_non_exhaustive()
    }
}
