//! # vigil-facts
//!
//! Facts and answers store for the Vigil gating engine.
//!
//! - [`FactsStore`]: last-write-wins facts, per-question answers, atomic
//!   answer commits, and the [`EvaluationContext`](vigil_core::EvaluationContext)
//!   view at a given instant.
//! - [`derive`]: turning a submitted answer into an [`AnswerRecord`].
//! - [`expiration`]: the answer-expiration rule table and reminder queries.
//! - [`snapshot_store`]: in-memory and JSON-file snapshot persistence.

pub mod derive;
pub mod expiration;
pub mod snapshot_store;
pub mod store;

pub use derive::{derive_answer, AnswerRecord};
pub use expiration::{format_expiration_date, Expiration, ExpirationPolicy, ExpirationRule};
pub use snapshot_store::{JsonFileSnapshotStore, MemorySnapshotStore};
pub use store::FactsStore;
