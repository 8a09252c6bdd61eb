pub mod answer;
pub mod confidence;
pub mod fact;
pub mod snapshot;
pub mod value;

pub use answer::Answer;
pub use confidence::Confidence;
pub use fact::{has_expired, Fact, FactMeta, FactSource};
pub use snapshot::StoreSnapshot;
pub use value::{AnswerValue, FactValue, ValueKind};
