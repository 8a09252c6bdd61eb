pub mod clock;
pub mod condition_evaluator;
pub mod snapshot_store;

pub use clock::{FixedClock, IClock, SystemClock};
pub use condition_evaluator::IConditionEvaluator;
pub use snapshot_store::ISnapshotStore;
