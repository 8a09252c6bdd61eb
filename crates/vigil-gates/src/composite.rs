//! Recursive condition trees for consumers that need more nesting than a
//! single gate (badge and achievement unlocks). Leaves are ordinary gate
//! conditions or whole gates, evaluated through [`IConditionEvaluator`].

use serde::{Deserialize, Serialize};
use vigil_core::constants::MAX_COMPOSITE_DEPTH;
use vigil_core::content::{Gate, GateCondition};
use vigil_core::traits::IConditionEvaluator;
use vigil_core::EvaluationContext;

/// A composite condition tree.
///
/// JSON form is externally tagged: `{"condition": {...}}`, `{"gate": {...}}`,
/// `{"all": [...]}`, `{"any": [...]}`, `{"not": {...}}`.
///
/// Unlike a [`Gate`]'s `any` clause, an empty `any` node here does not pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeCondition {
    Condition(GateCondition),
    Gate(Gate),
    All(Vec<CompositeCondition>),
    Any(Vec<CompositeCondition>),
    Not(Box<CompositeCondition>),
}

impl CompositeCondition {
    pub fn evaluate(&self, evaluator: &dyn IConditionEvaluator, ctx: &EvaluationContext) -> bool {
        self.evaluate_at(evaluator, ctx, 0)
    }

    fn evaluate_at(
        &self,
        evaluator: &dyn IConditionEvaluator,
        ctx: &EvaluationContext,
        depth: usize,
    ) -> bool {
        if depth > MAX_COMPOSITE_DEPTH {
            tracing::warn!(depth, "composite condition nested too deeply; not passing");
            return false;
        }
        match self {
            Self::Condition(condition) => evaluator.condition_passes(condition, ctx),
            Self::Gate(gate) => evaluator.gate_passes(gate, ctx),
            Self::All(children) => children
                .iter()
                .all(|c| c.evaluate_at(evaluator, ctx, depth + 1)),
            Self::Any(children) => children
                .iter()
                .any(|c| c.evaluate_at(evaluator, ctx, depth + 1)),
            Self::Not(child) => !child.evaluate_at(evaluator, ctx, depth + 1),
        }
    }

    /// Keys read anywhere in the tree, deduplicated, in first-reference order.
    pub fn referenced_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            Self::Condition(condition) => {
                if !keys.contains(&condition.question_id.as_str()) {
                    keys.push(&condition.question_id);
                }
            }
            Self::Gate(gate) => {
                for key in gate.referenced_keys() {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            Self::All(children) | Self::Any(children) => {
                for child in children {
                    child.collect_keys(keys);
                }
            }
            Self::Not(child) => child.collect_keys(keys),
        }
    }
}
