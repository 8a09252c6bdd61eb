use crate::content::{Gate, GateCondition};
use crate::context::EvaluationContext;

/// Evaluate one condition or one gate against a context.
///
/// The single seam through which every consumer of condition logic
/// (question gates, suite gates, composite badge-style trees) reaches the
/// comparator implementations.
pub trait IConditionEvaluator {
    fn condition_passes(&self, condition: &GateCondition, ctx: &EvaluationContext) -> bool;

    fn gate_passes(&self, gate: &Gate, ctx: &EvaluationContext) -> bool;
}
