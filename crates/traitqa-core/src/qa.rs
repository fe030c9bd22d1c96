//! Question-answering capability
//!
//! The model is opaque to the pipeline: one call takes a question and a
//! context passage and returns an answer span with a confidence score.

use crate::error::QaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Answer returned by a QA capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
    /// Answer text extracted from the context
    pub answer: String,
    /// Confidence in `[0, 1]`
    pub score: f64,
}

impl QaAnswer {
    /// Create answer
    #[inline]
    #[must_use]
    pub fn new(answer: impl Into<String>, score: f64) -> Self {
        Self {
            answer: answer.into(),
            score,
        }
    }
}

/// Extractive question answering over a context passage
///
/// Implementations must be callable repeatedly and concurrently; each call
/// is independent.
#[async_trait]
pub trait QaCapability: Send + Sync {
    /// Answer `question` from `context`
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError>;
}

#[async_trait]
impl<Q: QaCapability + ?Sized> QaCapability for Arc<Q> {
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError> {
        (**self).infer(question, context).await
    }
}

#[async_trait]
impl<Q: QaCapability + ?Sized> QaCapability for Box<Q> {
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError> {
        (**self).infer(question, context).await
    }
}
