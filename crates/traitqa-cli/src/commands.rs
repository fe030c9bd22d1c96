//! Subcommand implementations

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use traitqa_core::{
    BatchDriver, BatchStats, ModelConfig, NamedModel, TraitQaConfig, TraitQuestionSet,
};
use traitqa_http::HttpQaBackend;
use traitqa_parse::{normalize, resolve};
use traitqa_units::{NormalizedMeasurement, ResolvedValue, TraitKind};

/// Result of normalizing a single answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeOutput {
    /// Trait the answer was read as
    pub trait_kind: TraitKind,
    /// Raw answer text
    pub answer: String,
    /// Values in the trait's canonical unit
    pub normalized: NormalizedMeasurement,
    /// Single resolved value
    pub prediction: ResolvedValue,
}

impl fmt::Display for NormalizeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trait:      {}", self.trait_kind)?;
        writeln!(f, "answer:     {}", self.answer)?;
        writeln!(f, "normalized: {}", self.normalized)?;
        write!(
            f,
            "prediction: {} {}",
            self.prediction,
            self.trait_kind.canonical_unit()
        )
    }
}

/// Normalize and resolve one answer string for `trait_kind`
#[must_use]
pub fn normalize_answer(trait_kind: TraitKind, answer: &str) -> NormalizeOutput {
    let normalized = normalize(answer, trait_kind);
    let prediction = resolve(&normalized);
    NormalizeOutput {
        trait_kind,
        answer: answer.to_string(),
        normalized,
        prediction,
    }
}

/// Options for the `run` subcommand
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// TOML config file; defaults when absent
    pub config: Option<PathBuf>,
    /// JSON-lines rows to process
    pub input: PathBuf,
    /// JSON-lines results destination
    pub output: PathBuf,
    /// Overrides `max_concurrent_rows`
    pub max_concurrent_rows: Option<usize>,
    /// Extra `name=endpoint` models on top of the configured ones
    pub models: Vec<String>,
}

/// Build one cached HTTP model per configured endpoint
///
/// # Errors
/// Fails if an endpoint is invalid or its API key is missing
pub fn build_models(config: &TraitQaConfig) -> Result<Vec<NamedModel>> {
    config
        .models
        .iter()
        .map(|model| {
            let backend = HttpQaBackend::from_config(model)
                .with_context(|| format!("model '{}'", model.name))?;
            Ok(NamedModel::with_cache(
                model.name.clone(),
                backend,
                config.cache_capacity,
            ))
        })
        .collect()
}

fn parse_model_arg(arg: &str) -> Result<ModelConfig> {
    match arg.split_once('=') {
        Some((name, endpoint)) if !name.trim().is_empty() && !endpoint.trim().is_empty() => {
            Ok(ModelConfig::new(name.trim(), endpoint.trim()))
        }
        _ => bail!("expected NAME=ENDPOINT, got '{arg}'"),
    }
}

/// Load configuration with command-line overrides applied
///
/// # Errors
/// Fails on unreadable or invalid configuration
pub fn load_config(options: &RunOptions) -> Result<TraitQaConfig> {
    let mut config = match &options.config {
        Some(path) => TraitQaConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TraitQaConfig::default(),
    };

    if let Some(max) = options.max_concurrent_rows {
        config = config.with_max_concurrent_rows(max);
    }
    for arg in &options.models {
        config = config.with_model(parse_model_arg(arg)?);
    }

    config.validate()?;
    Ok(config)
}

/// Run the batch pipeline from an input rows file to an output results file
///
/// # Errors
/// Fails on configuration, IO, or batch setup errors. Per-row failures are
/// recorded in the output instead.
pub async fn run_batch(options: &RunOptions) -> Result<BatchStats> {
    let config = load_config(options)?;
    if config.models.is_empty() {
        bail!("no models configured; add [[models]] to the config or pass --model NAME=ENDPOINT");
    }

    let rows = crate::io::read_rows(&options.input)?;
    tracing::info!(rows = rows.len(), input = %options.input.display(), "loaded rows");

    let driver = BatchDriver::new(&config, build_models(&config)?)?;
    let report = driver.run(rows).await?;

    crate::io::write_results(&options.output, &report.rows)?;
    for (model, stats) in driver.cache_stats() {
        tracing::info!(
            %model,
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entry_count,
            hit_rate = stats.hit_rate(),
            "inference cache"
        );
    }
    for evaluation in report.evaluate(config.tolerance) {
        tracing::info!(
            trait_name = %evaluation.trait_name,
            model = %evaluation.model,
            coverage = evaluation.coverage,
            mae = ?evaluation.mean_absolute_error,
            within_tolerance = evaluation.within_tolerance,
            "evaluation"
        );
    }

    Ok(report.stats)
}

#[derive(Serialize)]
struct QuestionFile<'a> {
    traits: &'a [TraitQuestionSet],
}

/// Render question sets as a TOML `traits` table array
///
/// # Errors
/// Fails only if serialization fails
pub fn questions_toml(sets: &[TraitQuestionSet]) -> Result<String> {
    toml::to_string_pretty(&QuestionFile { traits: sets }).context("failed to render questions")
}
