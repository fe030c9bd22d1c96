//! Testing utilities for TraitQA workspace
//!
//! Shared stub QA capability and row fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use traitqa_core::{DescriptionRow, QaAnswer, QaCapability, QaError};

/// Deterministic QA capability that records every call
///
/// Questions without a scripted reply get the default answer.
#[derive(Debug)]
pub struct StubQa {
    default: QaAnswer,
    replies: HashMap<String, Result<QaAnswer, QaError>>,
    calls: AtomicUsize,
    asked: Mutex<Vec<(String, String)>>,
}

impl StubQa {
    pub fn new(answer: &str, score: f64) -> Self {
        Self {
            default: QaAnswer::new(answer, score),
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, question: &str, answer: &str, score: f64) -> Self {
        self.replies
            .insert(question.to_string(), Ok(QaAnswer::new(answer, score)));
        self
    }

    pub fn with_failure(mut self, question: &str, error: QaError) -> Self {
        self.replies.insert(question.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (question, context) pairs in call order
    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl QaCapability for StubQa {
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.asked
            .lock()
            .push((question.to_string(), context.to_string()));
        self.replies
            .get(question)
            .cloned()
            .unwrap_or_else(|| Ok(self.default.clone()))
    }
}

/// Small dataset with ground truth for every built-in trait
pub fn fixture_rows() -> Vec<DescriptionRow> {
    vec![
        DescriptionRow::new("acer", Some("Tree to 20 m tall; leaves 8-12 x 6-10 cm."))
            .with_truth("height", 20.0)
            .with_truth("leaf_length", 12.0)
            .with_truth("leaf_width", 10.0),
        DescriptionRow::new("moss", Some("A low cushion-forming moss."))
            .with_truth("height", 0.05),
        DescriptionRow::new("blank", None),
        DescriptionRow::new("fern", Some("Fronds 30-60 cm long, pinnae 2-3 cm wide."))
            .with_traits(["leaf_length", "leaf_width"]),
    ]
}

pub fn height_questions() -> traitqa_core::TraitQuestionSet {
    traitqa_core::TraitQuestionSet::default_for(traitqa_core::prelude::TraitKind::Height)
}
