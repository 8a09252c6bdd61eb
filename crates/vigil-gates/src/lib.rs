//! # vigil-gates
//!
//! Evaluates declarative gates (`all`/`any`/`none` of comparator
//! conditions) against an [`EvaluationContext`](vigil_core::EvaluationContext).
//! Pure and deterministic: no state, no I/O, never fails. Malformed
//! conditions resolve to a documented boolean and surface as diagnostics.

pub mod comparators;
pub mod composite;
pub mod evaluator;
pub mod verdict;

pub use composite::CompositeCondition;
pub use evaluator::{
    evaluate_condition, evaluate_gate, Clause, ConditionDiagnostic, GateDetails, GateEvaluation,
    GateEvaluator,
};
pub use verdict::{NotApplicable, Verdict};
