//! # vigil-core
//!
//! Foundation crate for the Vigil question-gating engine.
//! Defines the content model (gates, questions, suites), the fact/answer
//! model, errors, config, tracing setup, and the traits other crates plug into.

pub mod config;
pub mod constants;
pub mod content;
pub mod context;
pub mod errors;
pub mod facts;
pub mod logging;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VigilConfig;
pub use content::{
    Comparator, Gate, GateCondition, Phase, Question, QuestionBank, QuestionOption, Suite,
};
pub use context::EvaluationContext;
pub use errors::{VigilError, VigilResult};
pub use facts::{Answer, AnswerValue, Confidence, Fact, FactMeta, FactSource, FactValue};
