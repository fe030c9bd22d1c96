//! Error types for TraitQA Core
//!
//! Provides error handling for:
//! - Question-answering backend failures
//! - Question set and configuration validation
//! - Batch orchestration
//!
//! Expected "no answer" outcomes (`No Description`, `No Number`,
//! `NoMetric`, `TooManyNumbers`, `-1`) are values, never errors.

use std::path::PathBuf;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum TraitQaError {
    /// Question answering failed
    #[error("question answering failed: {0}")]
    Qa(#[from] QaError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Batch orchestration error
    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    /// Answer parsing error
    #[error("parse error: {0}")]
    Parse(#[from] traitqa_parse::ParseError),
}

/// Failure reported by a question-answering capability
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QaError {
    /// Backend could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend did not answer in time
    #[error("inference timed out after {secs}s")]
    Timeout {
        /// Timeout that elapsed
        secs: u64,
    },

    /// Backend answered with something unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Backend reported a model error
    #[error("backend error: {0}")]
    Backend(String),
}

impl QaError {
    /// Check if a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}

/// Invalid question set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionSetError {
    /// Trait name is blank
    #[error("question set has an empty trait name")]
    EmptyName,

    /// No question phrasings supplied
    #[error("question set '{0}' has no questions")]
    NoQuestions(String),

    /// A phrasing is blank
    #[error("question {index} of '{trait_name}' is blank")]
    BlankQuestion {
        /// Trait the set belongs to
        trait_name: String,
        /// Position of the blank question
        index: usize,
    },
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("invalid config syntax: {0}")]
    Syntax(#[from] toml::de::Error),

    /// Semantic validation failed
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Batch driver errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// No QA models configured
    #[error("no question-answering models configured")]
    NoModels,

    /// No question sets configured
    #[error("no trait question sets configured")]
    NoQuestionSets,

    /// A row worker panicked or was cancelled
    #[error("row worker failed: {0}")]
    WorkerFailed(String),
}

/// Result type alias for core operations
pub type TraitQaResult<T> = Result<T, TraitQaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_error_retryable() {
        assert!(QaError::Transport("reset".to_string()).is_retryable());
        assert!(QaError::Timeout { secs: 30 }.is_retryable());
        assert!(!QaError::InvalidResponse("no score".to_string()).is_retryable());
        assert!(!QaError::Backend("oom".to_string()).is_retryable());
    }

    #[test]
    fn question_set_error_display() {
        let err = QuestionSetError::BlankQuestion {
            trait_name: "height".to_string(),
            index: 2,
        };
        assert_eq!(err.to_string(), "question 2 of 'height' is blank");
    }

    #[test]
    fn error_conversions() {
        let err: TraitQaError = QaError::Timeout { secs: 5 }.into();
        assert!(matches!(err, TraitQaError::Qa(_)));

        let err: TraitQaError = BatchError::NoModels.into();
        assert!(err.to_string().contains("no question-answering models"));
    }
}
