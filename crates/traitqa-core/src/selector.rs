//! Best-answer selection
//!
//! Asks every phrasing of a trait question set against one description and
//! keeps the highest-scoring answer. Descriptions that cannot contain a
//! measurement are answered with a sentinel without calling the model.

use crate::error::QaError;
use crate::qa::QaCapability;
use crate::questions::TraitQuestionSet;
use serde::{Deserialize, Serialize};
use traitqa_units::round_to;

/// Answer text used when the description is missing or empty
pub const NO_DESCRIPTION: &str = "No Description";

/// Answer text used when the description holds no digit
pub const NO_NUMBER: &str = "No Number";

/// Decimal places kept on confidence scores
pub const SCORE_PRECISION: u32 = 3;

/// One question asked against one description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    /// Question phrasing
    pub question: String,
    /// Answer text
    pub answer: String,
    /// Rounded confidence
    pub score: f64,
}

/// Best answer for one (description, trait) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAnswer {
    /// Phrasing that produced the answer; empty for sentinels
    pub question: String,
    /// Answer text, or a sentinel
    pub answer: String,
    /// Rounded confidence; 0 for sentinels
    pub score: f64,
}

impl SelectedAnswer {
    /// Sentinel for a missing or empty description
    #[must_use]
    pub fn no_description() -> Self {
        Self::sentinel(NO_DESCRIPTION)
    }

    /// Sentinel for a description without any digit
    #[must_use]
    pub fn no_number() -> Self {
        Self::sentinel(NO_NUMBER)
    }

    fn sentinel(answer: &str) -> Self {
        Self {
            question: String::new(),
            answer: answer.to_string(),
            score: 0.0,
        }
    }

    /// Whether the model was skipped
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.question.is_empty() && (self.answer == NO_DESCRIPTION || self.answer == NO_NUMBER)
    }
}

impl From<AnswerCandidate> for SelectedAnswer {
    fn from(candidate: AnswerCandidate) -> Self {
        Self {
            question: candidate.question,
            answer: candidate.answer,
            score: candidate.score,
        }
    }
}

/// Drives a QA capability across a question set
#[derive(Debug, Clone)]
pub struct BestAnswerSelector<Q> {
    qa: Q,
}

impl<Q: QaCapability> BestAnswerSelector<Q> {
    /// Create selector over `qa`
    #[inline]
    #[must_use]
    pub fn new(qa: Q) -> Self {
        Self { qa }
    }

    /// Underlying capability
    #[inline]
    #[must_use]
    pub fn capability(&self) -> &Q {
        &self.qa
    }

    /// Select the best answer for `questions` against `description`
    ///
    /// Questions are asked in order, once each. Ties keep the earliest
    /// question.
    ///
    /// # Errors
    /// The first `QaError` from the capability; there is no retry here.
    pub async fn select(
        &self,
        questions: &TraitQuestionSet,
        description: Option<&str>,
    ) -> Result<SelectedAnswer, QaError> {
        let Some(description) = description.filter(|d| !d.is_empty()) else {
            return Ok(SelectedAnswer::no_description());
        };

        if !description.chars().any(|c| c.is_ascii_digit()) {
            tracing::debug!(trait_name = questions.name(), "description has no digit");
            return Ok(SelectedAnswer::no_number());
        }

        let mut best: Option<AnswerCandidate> = None;
        for question in questions.questions() {
            let reply = self.qa.infer(question, description).await?;
            let candidate = AnswerCandidate {
                question: question.clone(),
                answer: reply.answer,
                score: round_to(reply.score, SCORE_PRECISION),
            };
            tracing::debug!(
                trait_name = questions.name(),
                question = %candidate.question,
                answer = %candidate.answer,
                score = candidate.score,
                "candidate answer"
            );

            let better = best
                .as_ref()
                .map_or(true, |b| candidate.score > b.score || b.score.is_nan());
            if better {
                best = Some(candidate);
            }
        }

        // Question sets are validated non-empty
        Ok(best.map_or_else(SelectedAnswer::no_number, SelectedAnswer::from))
    }
}
