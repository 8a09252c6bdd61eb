//! Question-bank content errors.

use super::error_code::{self, VigilErrorCode};

/// Errors raised while loading or linting question-bank content.
///
/// These are build/lint-time failures. Runtime gate evaluation never
/// produces them.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Cannot read content from {path}: {message}")]
    Io { path: String, message: String },

    #[error("Content parse error in {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Content lint failed with {error_count} error(s): {summary}")]
    LintFailed { error_count: usize, summary: String },
}

impl VigilErrorCode for ContentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LintFailed { .. } => error_code::LINT_FAILED,
            _ => error_code::CONTENT_ERROR,
        }
    }
}
