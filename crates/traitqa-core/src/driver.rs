//! Batch driver
//!
//! Runs every description row through selection, parsing and resolution
//! for each (trait, model) pair:
//! - Rows are independent tokio tasks, bounded by a semaphore
//! - Each row produces an immutable [`RowResult`]
//! - Results are ordered by row index once all rows finish
//! - A QA failure fails only its own row

use crate::cache::{CacheHandle, CacheStats, CachedQa};
use crate::config::TraitQaConfig;
use crate::error::{BatchError, QaError, TraitQaError};
use crate::evaluation::{evaluate, TraitEvaluation};
use crate::qa::QaCapability;
use crate::questions::TraitQuestionSet;
use crate::selector::{BestAnswerSelector, SelectedAnswer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use traitqa_parse::{default_parsers, resolve, ParserRegistry};
use traitqa_units::{NormalizedMeasurement, ResolvedValue};

/// One input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionRow {
    /// Row identifier carried into the output
    pub id: String,
    /// Free-text species description
    #[serde(default)]
    pub description: Option<String>,
    /// Ground truth per trait name, for evaluation
    #[serde(default)]
    pub truth: BTreeMap<String, f64>,
    /// Trait names this row is relevant for; `None` means all
    #[serde(default)]
    pub traits: Option<Vec<String>>,
}

impl DescriptionRow {
    /// Create row
    #[must_use]
    pub fn new(id: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            id: id.into(),
            description: description.map(ToString::to_string),
            truth: BTreeMap::new(),
            traits: None,
        }
    }

    /// With ground truth for a trait
    #[must_use]
    pub fn with_truth(mut self, trait_name: impl Into<String>, value: f64) -> Self {
        self.truth.insert(trait_name.into(), value);
        self
    }

    /// Restrict the row to the named traits
    #[must_use]
    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = Some(traits.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `trait_name` passes the row's relevance mask
    #[must_use]
    pub fn is_relevant(&self, trait_name: &str) -> bool {
        self.traits
            .as_ref()
            .map_or(true, |traits| traits.iter().any(|t| t == trait_name))
    }
}

/// Output fields for one (trait, model) pair of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPrediction {
    /// Trait name
    pub trait_name: String,
    /// Model name
    pub model: String,
    /// Selected question
    pub question: String,
    /// Selected answer text
    pub answer: String,
    /// Selected score
    pub score: f64,
    /// Normalized measurement; `None` when the row was masked out
    pub normalized: Option<NormalizedMeasurement>,
    /// Resolved prediction; `None` when the row was masked out
    pub prediction: Option<ResolvedValue>,
}

impl TraitPrediction {
    /// Default values for a pair excluded by the relevance mask
    #[must_use]
    pub fn excluded(trait_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            trait_name: trait_name.into(),
            model: model.into(),
            question: String::new(),
            answer: String::new(),
            score: 0.0,
            normalized: None,
            prediction: None,
        }
    }

    /// Whether the pair was masked out
    #[inline]
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.prediction.is_none()
    }
}

/// Result of one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    /// Position in the input
    pub index: usize,
    /// Row identifier
    pub id: String,
    /// One entry per (trait, model) pair; empty if the row failed
    pub predictions: Vec<TraitPrediction>,
    /// Ground truth copied from the input
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub truth: BTreeMap<String, f64>,
    /// Failure message when the QA capability failed for this row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowResult {
    /// Prediction for a (trait, model) pair
    #[must_use]
    pub fn prediction(&self, trait_name: &str, model: &str) -> Option<&TraitPrediction> {
        self.predictions
            .iter()
            .find(|p| p.trait_name == trait_name && p.model == model)
    }

    /// Whether the row failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Batch statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Rows processed
    pub total_rows: usize,
    /// Rows whose pipeline failed
    pub failed_rows: usize,
    /// Predictions with a resolved value
    pub resolved_predictions: usize,
    /// (trait, model) pairs skipped by relevance masks
    pub excluded_pairs: usize,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

/// Results of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Row results ordered by input position
    pub rows: Vec<RowResult>,
    /// Summary statistics
    pub stats: BatchStats,
}

impl BatchReport {
    /// Compare predictions with ground truth
    #[must_use]
    pub fn evaluate(&self, tolerance: f64) -> Vec<TraitEvaluation> {
        evaluate(&self.rows, tolerance)
    }
}

/// A QA capability with the name used in output fields
#[derive(Clone)]
pub struct NamedModel {
    name: String,
    selector: BestAnswerSelector<Arc<dyn QaCapability>>,
    cache: Option<CacheHandle>,
}

impl std::fmt::Debug for NamedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedModel")
            .field("name", &self.name)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl NamedModel {
    /// Wrap a shared capability
    #[must_use]
    pub fn new(name: impl Into<String>, qa: Arc<dyn QaCapability>) -> Self {
        Self {
            name: name.into(),
            selector: BestAnswerSelector::new(qa),
            cache: None,
        }
    }

    /// Wrap a capability behind an inference cache; capacity 0 disables it
    #[must_use]
    pub fn with_cache<Q: QaCapability + 'static>(
        name: impl Into<String>,
        qa: Q,
        capacity: u64,
    ) -> Self {
        if capacity == 0 {
            return Self::new(name, Arc::new(qa));
        }

        let cached = CachedQa::new(qa, capacity);
        let handle = cached.handle();
        Self {
            cache: Some(handle),
            ..Self::new(name, Arc::new(cached))
        }
    }

    /// Model name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inference cache statistics, if this model is cached
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(CacheHandle::stats)
    }
}

/// Shared, read-only per-row pipeline
#[derive(Debug)]
struct RowPipeline {
    question_sets: Vec<TraitQuestionSet>,
    models: Vec<NamedModel>,
    parsers: ParserRegistry,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl RowPipeline {
    async fn run_row(&self, index: usize, row: DescriptionRow) -> RowResult {
        let (predictions, error) = match self.predict(&row).await {
            Ok(predictions) => (predictions, None),
            Err(e) => {
                tracing::warn!(row = %row.id, error = %e, "row failed");
                (Vec::new(), Some(e.to_string()))
            }
        };

        RowResult {
            index,
            id: row.id,
            predictions,
            truth: row.truth,
            error,
        }
    }

    async fn predict(&self, row: &DescriptionRow) -> Result<Vec<TraitPrediction>, TraitQaError> {
        let mut predictions = Vec::with_capacity(self.question_sets.len() * self.models.len());

        for set in &self.question_sets {
            for model in &self.models {
                if !row.is_relevant(set.name()) {
                    predictions.push(TraitPrediction::excluded(set.name(), model.name()));
                    continue;
                }

                let selected = self
                    .select_with_retry(model, set, row.description.as_deref())
                    .await?;
                let normalized = self.parsers.normalize(set.kind(), &selected.answer)?;
                let prediction = resolve(&normalized);

                tracing::debug!(
                    row = %row.id,
                    trait_name = set.name(),
                    model = model.name(),
                    %normalized,
                    %prediction,
                    "resolved prediction"
                );

                predictions.push(TraitPrediction {
                    trait_name: set.name().to_string(),
                    model: model.name().to_string(),
                    question: selected.question,
                    answer: selected.answer,
                    score: selected.score,
                    normalized: Some(normalized),
                    prediction: Some(prediction),
                });
            }
        }

        Ok(predictions)
    }

    async fn select_with_retry(
        &self,
        model: &NamedModel,
        set: &TraitQuestionSet,
        description: Option<&str>,
    ) -> Result<SelectedAnswer, QaError> {
        let mut attempt = 0;
        loop {
            match model.selector.select(set, description).await {
                Ok(selected) => return Ok(selected),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    let delay = self.retry_backoff.saturating_mul(1 << attempt.min(16));
                    tracing::warn!(
                        model = model.name(),
                        attempt = attempt + 1,
                        error = %e,
                        "retrying question answering"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Runs description rows through the extraction pipeline
#[derive(Debug, Clone)]
pub struct BatchDriver {
    pipeline: Arc<RowPipeline>,
    max_concurrent_rows: usize,
}

impl BatchDriver {
    /// Create driver from configuration and QA models
    ///
    /// # Errors
    /// - `BatchError::NoModels` if `models` is empty
    /// - `BatchError::NoQuestionSets` if the config has no traits
    pub fn new(config: &TraitQaConfig, models: Vec<NamedModel>) -> Result<Self, BatchError> {
        Self::with_parsers(config, models, default_parsers())
    }

    /// Create driver with a custom parser registry
    ///
    /// # Errors
    /// Same as [`BatchDriver::new`]
    pub fn with_parsers(
        config: &TraitQaConfig,
        models: Vec<NamedModel>,
        parsers: ParserRegistry,
    ) -> Result<Self, BatchError> {
        if models.is_empty() {
            return Err(BatchError::NoModels);
        }
        if config.traits.is_empty() {
            return Err(BatchError::NoQuestionSets);
        }

        Ok(Self {
            pipeline: Arc::new(RowPipeline {
                question_sets: config.traits.clone(),
                models,
                parsers,
                retry_attempts: config.retry_attempts,
                retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            }),
            max_concurrent_rows: config.max_concurrent_rows.max(1),
        })
    }

    /// Cache statistics per cached model, in model order
    #[must_use]
    pub fn cache_stats(&self) -> Vec<(String, CacheStats)> {
        self.pipeline
            .models
            .iter()
            .filter_map(|model| Some((model.name.clone(), model.cache_stats()?)))
            .collect()
    }

    /// Process a single row
    pub async fn process_row(&self, index: usize, row: DescriptionRow) -> RowResult {
        self.pipeline.run_row(index, row).await
    }

    /// Process all rows
    ///
    /// # Errors
    /// `BatchError::WorkerFailed` if a row task panicked
    pub async fn run(&self, rows: Vec<DescriptionRow>) -> Result<BatchReport, BatchError> {
        let started = Instant::now();
        let total_rows = rows.len();
        tracing::info!(
            rows = total_rows,
            traits = self.pipeline.question_sets.len(),
            models = self.pipeline.models.len(),
            concurrency = self.max_concurrent_rows,
            "starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_rows));
        let mut workers = JoinSet::new();

        for (index, row) in rows.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            workers.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                pipeline.run_row(index, row).await
            });
        }

        let mut results = Vec::with_capacity(total_rows);
        while let Some(joined) = workers.join_next().await {
            let row = joined.map_err(|e| BatchError::WorkerFailed(e.to_string()))?;
            results.push(row);
        }
        results.sort_by_key(|row| row.index);

        let stats = BatchStats {
            total_rows,
            failed_rows: results.iter().filter(|r| r.is_failed()).count(),
            resolved_predictions: results
                .iter()
                .flat_map(|r| &r.predictions)
                .filter(|p| p.prediction.is_some_and(|v| v.is_resolved()))
                .count(),
            excluded_pairs: results
                .iter()
                .flat_map(|r| &r.predictions)
                .filter(|p| p.is_excluded())
                .count(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        tracing::info!(
            rows = stats.total_rows,
            failed = stats.failed_rows,
            resolved = stats.resolved_predictions,
            elapsed_ms = stats.elapsed_ms,
            "batch finished"
        );

        Ok(BatchReport {
            rows: results,
            stats,
        })
    }
}
