//! Facts and answers store errors.

use super::error_code::{self, VigilErrorCode};

/// Errors rejected by the facts store before any state is touched.
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("Unknown question: {question_id}")]
    UnknownQuestion { question_id: String },

    #[error("Question {question_id} has no option {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    #[error("Invalid answer for {question_id}: {reason}")]
    InvalidAnswer { question_id: String, reason: String },

    #[error("Invalid fact {key:?}: {reason}")]
    InvalidFact { key: String, reason: String },
}

impl VigilErrorCode for FactsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownQuestion { .. } => error_code::UNKNOWN_QUESTION,
            Self::UnknownOption { .. } => error_code::UNKNOWN_OPTION,
            Self::InvalidAnswer { .. } => error_code::INVALID_ANSWER,
            Self::InvalidFact { .. } => error_code::INVALID_FACT,
        }
    }
}
