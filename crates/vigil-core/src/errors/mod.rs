//! Error handling for Vigil.
//! One error enum per subsystem, `thiserror` only.
//!
//! The gate evaluator has no error type: malformed conditions resolve to
//! non-passing verdicts and are reported as diagnostics instead.

pub mod config_error;
pub mod content_error;
pub mod error_code;
pub mod facts_error;
pub mod storage_error;
pub mod vigil_error;

pub use config_error::ConfigError;
pub use content_error::ContentError;
pub use error_code::VigilErrorCode;
pub use facts_error::FactsError;
pub use storage_error::StorageError;
pub use vigil_error::{VigilError, VigilResult};
