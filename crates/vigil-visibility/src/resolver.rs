//! Visibility resolution: which suites are unlocked and which questions are
//! visible, in presentation order.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use vigil_core::{EvaluationContext, Question, QuestionBank, Suite};
use vigil_gates::{ConditionDiagnostic, GateEvaluator};

/// What a gate guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GateOwner {
    Question { question_id: String },
    Suite { suite_id: String, gate_index: usize },
}

impl fmt::Display for GateOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question { question_id } => write!(f, "question {question_id}"),
            Self::Suite {
                suite_id,
                gate_index,
            } => write!(f, "suite {suite_id} gate #{gate_index}"),
        }
    }
}

/// A problem found during resolution. Never aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum VisibilityDiagnostic {
    /// A condition could not be applied and resolved to its fallback.
    Condition {
        owner: GateOwner,
        diagnostic: ConditionDiagnostic,
    },
    /// An unlocked suite lists a question the bank does not define.
    UnknownSuiteMember { suite_id: String, question_id: String },
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityResult {
    /// Visible question IDs in presentation order.
    pub visible_question_ids: Vec<String>,
    pub unlocked_suites: BTreeSet<String>,
    pub diagnostics: Vec<VisibilityDiagnostic>,
}

impl VisibilityResult {
    pub fn is_visible(&self, question_id: &str) -> bool {
        self.visible_question_ids.iter().any(|id| id == question_id)
    }

    pub fn is_unlocked(&self, suite_id: &str) -> bool {
        self.unlocked_suites.contains(suite_id)
    }

    /// Visible questions the user still has to answer, in order.
    ///
    /// The resolver itself never hides answered questions; this is the
    /// presentation policy layered on top.
    pub fn pending<F>(&self, is_answered: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.visible_question_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !is_answered(id))
            .collect()
    }
}

/// Resolves a bank against a context. Stateless: the same bank and context
/// always produce the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityResolver {
    evaluator: GateEvaluator,
}

impl VisibilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, bank: &QuestionBank, ctx: &EvaluationContext) -> VisibilityResult {
        let span = tracing::info_span!(
            "vigil.resolve",
            questions = bank.len(),
            suites = bank.suites().len(),
            context_keys = ctx.len(),
        );
        let _guard = span.enter();

        let mut diagnostics = Vec::new();

        let unlocked: Vec<&Suite> = bank
            .suites()
            .iter()
            .filter(|suite| self.suite_unlocked(suite, ctx, &mut diagnostics))
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut candidates: Vec<&Question> = Vec::new();
        for question in bank.base_questions() {
            if seen.insert(question.id.as_str()) {
                candidates.push(question);
            }
        }
        for suite in &unlocked {
            for member in &suite.question_ids {
                match bank.question(member) {
                    Some(question) => {
                        if seen.insert(question.id.as_str()) {
                            candidates.push(question);
                        }
                    }
                    None => {
                        tracing::warn!(
                            suite_id = %suite.id,
                            question_id = %member,
                            "suite member not in bank"
                        );
                        diagnostics.push(VisibilityDiagnostic::UnknownSuiteMember {
                            suite_id: suite.id.clone(),
                            question_id: member.clone(),
                        });
                    }
                }
            }
        }

        let mut visible: Vec<(&Question, usize)> = candidates
            .into_iter()
            .filter(|question| self.question_passes(question, ctx, &mut diagnostics))
            .map(|question| (question, bank.position(&question.id).unwrap_or(usize::MAX)))
            .collect();
        visible.sort_by(|(a, a_pos), (b, b_pos)| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.phase.rank().cmp(&b.phase.rank()))
                .then_with(|| a_pos.cmp(b_pos))
        });

        let result = VisibilityResult {
            visible_question_ids: visible.into_iter().map(|(q, _)| q.id.clone()).collect(),
            unlocked_suites: unlocked.iter().map(|s| s.id.clone()).collect(),
            diagnostics,
        };
        tracing::debug!(
            visible = result.visible_question_ids.len(),
            unlocked = result.unlocked_suites.len(),
            diagnostics = result.diagnostics.len(),
            "visibility resolved"
        );
        result
    }

    /// Unlocked suites from a result, highest suite priority first, then
    /// declaration order.
    pub fn ordered_suites<'b>(
        &self,
        bank: &'b QuestionBank,
        result: &VisibilityResult,
    ) -> Vec<&'b Suite> {
        let mut suites: Vec<(usize, &Suite)> = bank
            .suites()
            .iter()
            .enumerate()
            .filter(|(_, s)| result.is_unlocked(&s.id))
            .collect();
        suites.sort_by(|(a_pos, a), (b_pos, b)| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a_pos.cmp(b_pos))
        });
        suites.into_iter().map(|(_, s)| s).collect()
    }

    /// AND across the suite's gates. Every gate is evaluated so each one's
    /// diagnostics are reported.
    fn suite_unlocked(
        &self,
        suite: &Suite,
        ctx: &EvaluationContext,
        diagnostics: &mut Vec<VisibilityDiagnostic>,
    ) -> bool {
        let mut unlocked = true;
        for (gate_index, gate) in suite.gates.iter().enumerate() {
            let evaluation = self.evaluator.evaluate(gate, ctx);
            unlocked &= evaluation.passes;
            diagnostics.extend(evaluation.diagnostics.into_iter().map(|diagnostic| {
                VisibilityDiagnostic::Condition {
                    owner: GateOwner::Suite {
                        suite_id: suite.id.clone(),
                        gate_index,
                    },
                    diagnostic,
                }
            }));
        }
        unlocked
    }

    fn question_passes(
        &self,
        question: &Question,
        ctx: &EvaluationContext,
        diagnostics: &mut Vec<VisibilityDiagnostic>,
    ) -> bool {
        let evaluation = self.evaluator.evaluate(&question.conditions, ctx);
        diagnostics.extend(evaluation.diagnostics.into_iter().map(|diagnostic| {
            VisibilityDiagnostic::Condition {
                owner: GateOwner::Question {
                    question_id: question.id.clone(),
                },
                diagnostic,
            }
        }));
        evaluation.passes
    }
}
