//! VigilErrorCode trait for structured error reporting.

/// Trait for attaching a stable machine-readable code to every error.
/// Diagnostics panels and log consumers key on the code, not the message.
pub trait VigilErrorCode {
    /// Returns the error code string (e.g., "CONTENT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted tagged string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONTENT_ERROR: &str = "CONTENT_ERROR";
pub const LINT_FAILED: &str = "LINT_FAILED";
pub const UNKNOWN_QUESTION: &str = "UNKNOWN_QUESTION";
pub const UNKNOWN_OPTION: &str = "UNKNOWN_OPTION";
pub const INVALID_ANSWER: &str = "INVALID_ANSWER";
pub const INVALID_FACT: &str = "INVALID_FACT";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const SNAPSHOT_CORRUPT: &str = "SNAPSHOT_CORRUPT";
