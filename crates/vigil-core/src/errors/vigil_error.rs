//! Aggregate error type for operations spanning several subsystems.

use super::error_code::VigilErrorCode;
use super::{ConfigError, ContentError, FactsError, StorageError};

/// Top-level error, aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Facts error: {0}")]
    Facts(#[from] FactsError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl VigilErrorCode for VigilError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Content(e) => e.error_code(),
            Self::Facts(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}

/// Convenience alias used across the workspace.
pub type VigilResult<T> = Result<T, VigilError>;
