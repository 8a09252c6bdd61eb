//! Property tests for the visibility resolver.

use proptest::prelude::*;
use vigil_core::content::{Comparator, Gate, GateCondition, Question, QuestionBank, Suite};
use vigil_core::{EvaluationContext, FactValue};
use vigil_visibility::VisibilityResolver;

const KEYS: [&str; 5] = ["k0", "k1", "k2", "k3", "k4"];

/// Conditions using only comparators that can flip from false to true when
/// a key gains a value, never back.
fn arb_positive_condition() -> impl Strategy<Value = GateCondition> {
    (
        prop::sample::select(KEYS.to_vec()),
        prop::sample::select(vec![
            Comparator::Equals,
            Comparator::In,
            Comparator::Exists,
            Comparator::Truthy,
        ]),
        prop::sample::select(vec!["yes", "no"]),
    )
        .prop_map(|(key, when, value)| match when {
            Comparator::In => GateCondition::new(key, when).with_values([value, "maybe"]),
            Comparator::Equals => GateCondition::new(key, when).with_value(value),
            _ => GateCondition::new(key, when),
        })
}

fn arb_positive_gate() -> impl Strategy<Value = Gate> {
    (
        prop::collection::vec(arb_positive_condition(), 0..3),
        prop::collection::vec(arb_positive_condition(), 0..3),
    )
        .prop_map(|(all, any)| Gate::open().with_all(all).with_any(any))
}

fn arb_bank() -> impl Strategy<Value = QuestionBank> {
    (
        prop::collection::vec((arb_positive_gate(), -3i32..3), 1..8),
        prop::collection::vec(prop::collection::vec(arb_positive_gate(), 0..2), 0..3),
    )
        .prop_map(|(questions, suites)| {
            let questions: Vec<Question> = questions
                .into_iter()
                .enumerate()
                .map(|(i, (gate, priority))| {
                    Question::new(format!("q{i}"))
                        .with_conditions(gate)
                        .with_priority(priority)
                })
                .collect();
            let suites = suites
                .into_iter()
                .enumerate()
                .map(|(i, gates)| {
                    let mut suite = Suite::new(format!("s{i}"))
                        .with_question(Question::new(format!("s{i}_member")));
                    for gate in gates {
                        suite = suite.with_gate(gate);
                    }
                    suite
                })
                .collect();
            QuestionBank::new(questions, suites)
        })
}

fn arb_value() -> impl Strategy<Value = FactValue> {
    prop::sample::select(vec!["yes", "no", "maybe", ""]).prop_map(FactValue::from)
}

fn arb_context() -> impl Strategy<Value = Vec<(&'static str, FactValue)>> {
    prop::collection::vec((prop::sample::select(KEYS.to_vec()), arb_value()), 0..5)
}

proptest! {
    /// Adding facts for keys that were absent never hides anything when
    /// every gate uses positive comparators only.
    #[test]
    fn visibility_is_monotonic_under_added_facts(
        bank in arb_bank(),
        base in arb_context(),
        extra in arb_context(),
    ) {
        let before: EvaluationContext = base.iter().cloned().collect();
        let mut after = before.clone();
        for (key, value) in extra {
            if !after.contains(key) {
                after.insert(key, value);
            }
        }

        let resolver = VisibilityResolver::new();
        let r1 = resolver.resolve(&bank, &before);
        let r2 = resolver.resolve(&bank, &after);

        for id in &r1.visible_question_ids {
            prop_assert!(r2.is_visible(id), "{} disappeared", id);
        }
        prop_assert!(r1.unlocked_suites.is_subset(&r2.unlocked_suites));
    }

    #[test]
    fn visible_ids_are_unique_and_sorted(bank in arb_bank(), ctx in arb_context()) {
        let ctx: EvaluationContext = ctx.into_iter().collect();
        let result = VisibilityResolver::new().resolve(&bank, &ctx);

        let mut unique = result.visible_question_ids.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), result.visible_question_ids.len());

        let keys: Vec<(i32, usize)> = result
            .visible_question_ids
            .iter()
            .map(|id| {
                let q = bank.question(id).unwrap();
                (-q.priority, bank.position(id).unwrap())
            })
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}
