//! Static question-bank content: gates, questions, suites.
//! Content is immutable once loaded; only visibility is computed.

pub mod bank;
pub mod comparator;
pub mod gate;
pub mod question;
pub mod suite;

pub use bank::QuestionBank;
pub use comparator::Comparator;
pub use gate::{Gate, GateCondition};
pub use question::{Phase, Question, QuestionOption};
pub use suite::Suite;
