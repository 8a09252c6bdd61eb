use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vigil_core::config::VisibilityConfig;
use vigil_core::content::{Gate, GateCondition, Question, QuestionBank, QuestionOption, Suite};
use vigil_core::EvaluationContext;
use vigil_visibility::{lint_bank, DependencyGraph, VisibilityResolver};

/// A bank of `n` questions, each gated on the previous answer, with one
/// suite per ten questions.
fn build_chain_bank(n: usize) -> QuestionBank {
    let questions: Vec<Question> = (0..n)
        .map(|i| {
            let mut q = Question::new(format!("q{i}"))
                .with_priority((i % 100) as i32)
                .with_option(QuestionOption::new("yes", 1).with_fact(format!("f{i}"), true))
                .with_option(QuestionOption::new("no", 0));
            if i > 0 {
                let previous = GateCondition::equals(format!("q{}", i - 1), "yes");
                q = q.with_conditions(Gate::open().with_all(vec![previous]));
            }
            q
        })
        .collect();
    let suites: Vec<Suite> = (0..n / 10)
        .map(|s| {
            let trigger = GateCondition::exists(format!("f{}", s * 10));
            Suite::new(format!("s{s}"))
                .with_gate(Gate::open().with_any(vec![trigger]))
                .with_question(Question::new(format!("s{s}_extra")))
        })
        .collect();
    QuestionBank::new(questions, suites)
}

fn bench_resolve(c: &mut Criterion) {
    let bank = build_chain_bank(500);
    let ctx: EvaluationContext = (0..250)
        .flat_map(|i| [(format!("q{i}"), "yes"), (format!("f{i}"), "true")])
        .collect();
    let resolver = VisibilityResolver::new();

    c.bench_function("resolve_500_questions", |b| {
        b.iter(|| resolver.resolve(black_box(&bank), black_box(&ctx)))
    });
}

fn bench_lint(c: &mut Criterion) {
    let bank = build_chain_bank(500);
    let config = VisibilityConfig::default();

    c.bench_function("dependency_graph_500_questions", |b| {
        b.iter(|| DependencyGraph::build(black_box(&bank)).find_cycles())
    });
    c.bench_function("lint_500_questions", |b| {
        b.iter(|| lint_bank(black_box(&bank), black_box(&config)))
    });
}

criterion_group!(benches, bench_resolve, bench_lint);
criterion_main!(benches);
