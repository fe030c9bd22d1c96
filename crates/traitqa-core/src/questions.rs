//! Trait question sets
//!
//! Each trait is asked through a few paraphrases; the best-scoring answer
//! across them is kept.

use crate::error::QuestionSetError;
use serde::{Deserialize, Serialize};
use traitqa_units::{TraitKind, Unit};

/// Ordered question phrasings for one trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestionSet")]
pub struct TraitQuestionSet {
    name: String,
    kind: TraitKind,
    questions: Vec<String>,
}

#[derive(Deserialize)]
struct RawQuestionSet {
    name: Option<String>,
    kind: TraitKind,
    questions: Vec<String>,
}

impl TryFrom<RawQuestionSet> for TraitQuestionSet {
    type Error = QuestionSetError;

    fn try_from(raw: RawQuestionSet) -> Result<Self, Self::Error> {
        let name = raw.name.unwrap_or_else(|| raw.kind.name().to_string());
        Self::new(name, raw.kind, raw.questions)
    }
}

impl TraitQuestionSet {
    /// Create a validated question set
    ///
    /// # Errors
    /// - `QuestionSetError::EmptyName` for a blank name
    /// - `QuestionSetError::NoQuestions` when `questions` is empty
    /// - `QuestionSetError::BlankQuestion` when any phrasing is blank
    pub fn new<I, S>(
        name: impl Into<String>,
        kind: TraitKind,
        questions: I,
    ) -> Result<Self, QuestionSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QuestionSetError::EmptyName);
        }

        let questions: Vec<String> = questions.into_iter().map(Into::into).collect();
        if questions.is_empty() {
            return Err(QuestionSetError::NoQuestions(name));
        }
        if let Some(index) = questions.iter().position(|q| q.trim().is_empty()) {
            return Err(QuestionSetError::BlankQuestion {
                trait_name: name,
                index,
            });
        }

        Ok(Self {
            name,
            kind,
            questions,
        })
    }

    /// Built-in phrasings for `kind`
    #[must_use]
    pub fn default_for(kind: TraitKind) -> Self {
        let questions: &[&str] = match kind {
            TraitKind::Height => &[
                "What is the height of the plant?",
                "How tall is the plant?",
                "How tall does it grow?",
                "What is the maximum height?",
            ],
            TraitKind::LeafLength => &[
                "What is the length of the leaves?",
                "How long are the leaves?",
                "What is the leaf size?",
            ],
            TraitKind::LeafWidth => &[
                "What is the width of the leaves?",
                "How wide are the leaves?",
                "What is the leaf size?",
            ],
        };

        Self {
            name: kind.name().to_string(),
            kind,
            questions: questions.iter().map(ToString::to_string).collect(),
        }
    }

    /// Built-in question sets for every trait kind
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        TraitKind::ALL.into_iter().map(Self::default_for).collect()
    }

    /// Trait name used in output fields
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trait kind, selecting parser and canonical unit
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TraitKind {
        self.kind
    }

    /// Question phrasings in evaluation order
    #[inline]
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Unit predictions are reported in
    #[inline]
    #[must_use]
    pub fn canonical_unit(&self) -> Unit {
        self.kind.canonical_unit()
    }

    /// Divisor from millimetres into the canonical unit
    #[inline]
    #[must_use]
    pub fn divisor(&self) -> f64 {
        self.kind.divisor()
    }
}
