//! Gate evaluation: per-clause results, the all/any/none algebra, and the
//! diagnostics a diagnostics panel consumes verbatim.

use serde::Serialize;
use vigil_core::content::{Gate, GateCondition};
use vigil_core::traits::IConditionEvaluator;
use vigil_core::EvaluationContext;

use crate::comparators;
use crate::verdict::{NotApplicable, Verdict};

/// Which clause of a gate a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    All,
    Any,
    #[serde(rename = "none")]
    NoneOf,
}

impl Clause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
            Self::NoneOf => "none",
        }
    }
}

/// Per-condition results, in input order, plus the three clause results.
///
/// For `none`, each entry is whether that condition matched; the clause
/// passes when no entry is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDetails {
    pub all: Vec<bool>,
    pub any: Vec<bool>,
    pub none: Vec<bool>,
    pub all_passes: bool,
    pub any_passes: bool,
    pub none_passes: bool,
}

/// A condition that could not be applied and resolved to its fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDiagnostic {
    pub clause: Clause,
    pub index: usize,
    pub question_id: String,
    pub comparator: String,
    pub reason: NotApplicable,
    pub resolved_to: bool,
}

/// Result of evaluating one gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateEvaluation {
    pub passes: bool,
    pub details: GateDetails,
    pub diagnostics: Vec<ConditionDiagnostic>,
}

/// Evaluate a single condition against the context.
pub fn evaluate_condition(condition: &GateCondition, ctx: &EvaluationContext) -> Verdict {
    comparators::compare(
        &condition.when,
        ctx.get(&condition.question_id),
        condition.value.as_ref(),
        condition.values.as_deref(),
    )
}

/// Evaluate a gate against the context.
///
/// `passes = all_passes && any_passes && none_passes`, where each clause is
/// vacuously true when absent or empty.
pub fn evaluate_gate(gate: &Gate, ctx: &EvaluationContext) -> GateEvaluation {
    let mut diagnostics = Vec::new();

    let all = evaluate_clause(Clause::All, gate.all.as_deref(), ctx, &mut diagnostics);
    let any = evaluate_clause(Clause::Any, gate.any.as_deref(), ctx, &mut diagnostics);
    let none = evaluate_clause(Clause::NoneOf, gate.none.as_deref(), ctx, &mut diagnostics);

    let all_passes = all.iter().all(|&r| r);
    let any_passes = any.is_empty() || any.iter().any(|&r| r);
    let none_passes = !none.iter().any(|&r| r);

    GateEvaluation {
        passes: all_passes && any_passes && none_passes,
        details: GateDetails {
            all,
            any,
            none,
            all_passes,
            any_passes,
            none_passes,
        },
        diagnostics,
    }
}

fn evaluate_clause(
    clause: Clause,
    conditions: Option<&[GateCondition]>,
    ctx: &EvaluationContext,
    diagnostics: &mut Vec<ConditionDiagnostic>,
) -> Vec<bool> {
    let Some(conditions) = conditions else {
        return Vec::new();
    };

    conditions
        .iter()
        .enumerate()
        .map(|(index, condition)| {
            let verdict = evaluate_condition(condition, ctx);
            let passed = verdict.passed();
            if let Verdict::NotApplicable { reason, fallback } = verdict {
                tracing::warn!(
                    clause = clause.as_str(),
                    index,
                    question_id = %condition.question_id,
                    comparator = %condition.when,
                    resolved_to = fallback,
                    "malformed gate condition: {reason}"
                );
                diagnostics.push(ConditionDiagnostic {
                    clause,
                    index,
                    question_id: condition.question_id.clone(),
                    comparator: condition.when.to_string(),
                    reason,
                    resolved_to: fallback,
                });
            }
            passed
        })
        .collect()
}

/// Stateless evaluator exposing the gate algebra through
/// [`IConditionEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GateEvaluator;

impl GateEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, gate: &Gate, ctx: &EvaluationContext) -> GateEvaluation {
        evaluate_gate(gate, ctx)
    }

    /// AND across a list of gates, as suites use them. Short-circuits on the
    /// first failing gate; an empty list passes.
    pub fn all_pass(&self, gates: &[Gate], ctx: &EvaluationContext) -> bool {
        gates.iter().all(|gate| evaluate_gate(gate, ctx).passes)
    }
}

impl IConditionEvaluator for GateEvaluator {
    fn condition_passes(&self, condition: &GateCondition, ctx: &EvaluationContext) -> bool {
        evaluate_condition(condition, ctx).passed()
    }

    fn gate_passes(&self, gate: &Gate, ctx: &EvaluationContext) -> bool {
        evaluate_gate(gate, ctx).passes
    }
}
