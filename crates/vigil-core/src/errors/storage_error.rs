//! Snapshot storage errors.

use super::error_code::{self, VigilErrorCode};

/// Errors from the opaque snapshot storage collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Snapshot serialization failed: {message}")]
    Serialization { message: String },

    #[error("Snapshot corrupt: {details}")]
    Corrupt { details: String },
}

impl VigilErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Corrupt { .. } => error_code::SNAPSHOT_CORRUPT,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
