//! Property tests for the gate algebra.

use proptest::prelude::*;

use vigil_core::content::{Comparator, Gate, GateCondition};
use vigil_core::{EvaluationContext, FactValue};
use vigil_gates::{evaluate_condition, evaluate_gate};

const KEYS: [&str; 4] = ["a", "b", "c", "d"];

fn arb_value() -> impl Strategy<Value = FactValue> {
    prop_oneof![
        any::<bool>().prop_map(FactValue::Bool),
        (-5i32..5).prop_map(|n| FactValue::Num(f64::from(n))),
        prop::sample::select(vec!["yes", "no", ""]).prop_map(FactValue::from),
        prop::collection::vec(prop::sample::select(vec!["x", "y"]), 0..3)
            .prop_map(FactValue::from),
    ]
}

fn arb_comparator() -> impl Strategy<Value = Comparator> {
    prop::sample::select(Comparator::KNOWN.to_vec()).prop_map(Comparator::parse)
}

fn arb_condition() -> impl Strategy<Value = GateCondition> {
    (
        prop::sample::select(KEYS.to_vec()),
        arb_comparator(),
        prop::option::of(arb_value()),
        prop::option::of(prop::collection::vec(arb_value(), 0..3)),
    )
        .prop_map(|(key, when, value, values)| GateCondition {
            question_id: key.to_string(),
            when,
            value,
            values,
        })
}

fn arb_clause() -> impl Strategy<Value = Option<Vec<GateCondition>>> {
    prop::option::of(prop::collection::vec(arb_condition(), 0..4))
}

fn arb_gate() -> impl Strategy<Value = Gate> {
    (arb_clause(), arb_clause(), arb_clause()).prop_map(|(all, any, none)| Gate { all, any, none })
}

fn arb_context() -> impl Strategy<Value = EvaluationContext> {
    prop::collection::vec((prop::sample::select(KEYS.to_vec()), arb_value()), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn passes(conditions: &Option<Vec<GateCondition>>, ctx: &EvaluationContext) -> Vec<bool> {
    conditions
        .iter()
        .flatten()
        .map(|c| evaluate_condition(c, ctx).passed())
        .collect()
}

proptest! {
    #[test]
    fn algebra_matches_clause_results(gate in arb_gate(), ctx in arb_context()) {
        let all = passes(&gate.all, &ctx);
        let any = passes(&gate.any, &ctx);
        let none = passes(&gate.none, &ctx);
        let expected = all.iter().all(|&b| b)
            && (any.is_empty() || any.iter().any(|&b| b))
            && !none.iter().any(|&b| b);

        let result = evaluate_gate(&gate, &ctx);
        prop_assert_eq!(result.passes, expected);
        prop_assert_eq!(result.details.all, all);
        prop_assert_eq!(result.details.any, any);
        prop_assert_eq!(result.details.none, none);
    }

    #[test]
    fn evaluation_is_deterministic(gate in arb_gate(), ctx in arb_context()) {
        prop_assert_eq!(evaluate_gate(&gate, &ctx), evaluate_gate(&gate, &ctx));
    }

    #[test]
    fn empty_gate_always_passes(ctx in arb_context()) {
        prop_assert!(evaluate_gate(&Gate::open(), &ctx).passes);
    }

    #[test]
    fn equals_fails_closed_without_key(value in arb_value(), ctx in arb_context()) {
        let mut ctx = ctx;
        ctx.remove("a");
        let cond = GateCondition::new("a", Comparator::Equals).with_value(value);
        prop_assert!(!evaluate_condition(&cond, &ctx).passed());
    }

    #[test]
    fn negations_are_complements_when_applicable(cond in arb_condition(), ctx in arb_context()) {
        let negated = match cond.when {
            Comparator::Exists => Comparator::NotExists,
            Comparator::Truthy => Comparator::Falsy,
            _ => return Ok(()),
        };
        let mut other = cond.clone();
        other.when = negated;
        prop_assert_ne!(
            evaluate_condition(&cond, &ctx).passed(),
            evaluate_condition(&other, &ctx).passed()
        );
    }
}
