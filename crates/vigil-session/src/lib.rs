//! # vigil-session
//!
//! One user's assessment: a question bank, the facts/answers store, a
//! clock, the expiration policy and the visibility resolver, wired so that
//! submitting an answer updates facts and the next visibility pass sees
//! all of them at once.

pub mod session;

pub use session::AssessmentSession;
