//! TraitQA Core
//!
//! Extracts numeric plant traits from free-text species descriptions:
//! - Asks a question-answering capability several phrasings per trait
//! - Keeps the highest-confidence answer
//! - Normalizes it into the trait's canonical unit and resolves one value
//! - Runs whole datasets row-parallel and evaluates against ground truth
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use traitqa_core::{BatchDriver, DescriptionRow, NamedModel, TraitQaConfig};
//!
//! # async fn example(qa: Arc<dyn traitqa_core::QaCapability>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = TraitQaConfig::new();
//! let driver = BatchDriver::new(&config, vec![NamedModel::new("roberta", qa)])?;
//!
//! let rows = vec![DescriptionRow::new("sp-1", Some("Shrub to 2 m tall; leaves 3-5 x 1-2 cm."))];
//! let report = driver.run(rows).await?;
//!
//! for evaluation in report.evaluate(config.tolerance) {
//!     println!("{evaluation}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod evaluation;
pub mod qa;
pub mod questions;
pub mod selector;

// Re-exports for convenience
pub use cache::{CacheHandle, CacheStats, CachedQa};
pub use config::{ModelConfig, TraitQaConfig};
pub use driver::{
    BatchDriver, BatchReport, BatchStats, DescriptionRow, NamedModel, RowResult, TraitPrediction,
};
pub use error::{BatchError, ConfigError, QaError, QuestionSetError, TraitQaError, TraitQaResult};
pub use evaluation::{evaluate, TraitEvaluation};
pub use qa::{QaAnswer, QaCapability};
pub use questions::TraitQuestionSet;
pub use selector::{AnswerCandidate, BestAnswerSelector, SelectedAnswer, NO_DESCRIPTION, NO_NUMBER};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with TraitQA Core
    pub use crate::{
        BatchDriver, BestAnswerSelector, DescriptionRow, NamedModel, QaAnswer, QaCapability,
        QaError, SelectedAnswer, TraitQaConfig, TraitQuestionSet,
    };
    pub use traitqa_units::{NormalizedMeasurement, ResolvedValue, TraitKind};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
