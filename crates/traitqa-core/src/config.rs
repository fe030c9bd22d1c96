//! Configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields a usable configuration with the built-in question
//! sets.
//!
//! ```toml
//! max_concurrent_rows = 8
//! retry_attempts = 2
//!
//! [[traits]]
//! kind = "height"
//! questions = ["How tall is the plant?", "What is the height?"]
//!
//! [[models]]
//! name = "roberta"
//! endpoint = "http://localhost:8080/qa"
//! ```

use crate::error::ConfigError;
use crate::questions::TraitQuestionSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitQaConfig {
    /// Rows processed concurrently
    pub max_concurrent_rows: usize,
    /// Extra attempts after a retryable QA failure
    pub retry_attempts: u32,
    /// Delay before the first retry, doubled on each further attempt
    pub retry_backoff_ms: u64,
    /// Cached answers per model; 0 disables caching
    pub cache_capacity: u64,
    /// Relative error under which a prediction counts as correct
    pub tolerance: f64,
    /// Trait question sets
    pub traits: Vec<TraitQuestionSet>,
    /// QA backends
    pub models: Vec<ModelConfig>,
}

impl TraitQaConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max concurrent rows
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_rows(mut self, max: usize) -> Self {
        self.max_concurrent_rows = max;
        self
    }

    /// With retry attempts
    #[inline]
    #[must_use]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With question sets
    #[inline]
    #[must_use]
    pub fn with_traits(mut self, traits: Vec<TraitQuestionSet>) -> Self {
        self.traits = traits;
        self
    }

    /// With an additional model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.models.push(model);
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// `ConfigError::Syntax` for malformed TOML, otherwise see [`Self::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, plus any parse error
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Load from `path`, falling back to defaults when it does not exist
    ///
    /// # Errors
    /// Any error other than a missing file
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "config not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::io_error(path, e)),
        }
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_rows == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_rows must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }

        let mut trait_names = HashSet::new();
        for set in &self.traits {
            if !trait_names.insert(set.name()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate trait name: '{}'",
                    set.name()
                )));
            }
        }

        let mut model_names = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(ConfigError::Invalid("model name is empty".to_string()));
            }
            if !model_names.insert(model.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate model name: '{}'",
                    model.name
                )));
            }
        }

        Ok(())
    }
}

impl Default for TraitQaConfig {
    fn default() -> Self {
        Self {
            max_concurrent_rows: 4,
            retry_attempts: 0,
            retry_backoff_ms: 250,
            cache_capacity: 10_000,
            tolerance: 0.1,
            traits: TraitQuestionSet::defaults(),
            models: Vec::new(),
        }
    }
}

/// QA backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Name used in output fields
    pub name: String,
    /// Inference endpoint URL
    pub endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding a bearer token
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ModelConfig {
    /// Create model settings with the default timeout
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
            api_key_env: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use traitqa_units::TraitKind;

    #[test]
    fn empty_toml_is_default() {
        let config = TraitQaConfig::from_toml_str("").unwrap();
        assert_eq!(config, TraitQaConfig::default());
        assert_eq!(config.traits.len(), 3);
    }

    #[test]
    fn parses_traits_and_models() {
        let config = TraitQaConfig::from_toml_str(
            r#"
            max_concurrent_rows = 8
            retry_attempts = 2

            [[traits]]
            name = "plant_height"
            kind = "height"
            questions = ["How tall?"]

            [[models]]
            name = "roberta"
            endpoint = "http://localhost:8080/qa"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_concurrent_rows, 8);
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.traits.len(), 1);
        assert_eq!(config.traits[0].name(), "plant_height");
        assert_eq!(config.traits[0].kind(), TraitKind::Height);
        assert_eq!(config.models[0].timeout_secs, 30);
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = TraitQaConfig::from_toml_str("max_concurrent_rows = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_models() {
        let config = TraitQaConfig::new()
            .with_model(ModelConfig::new("a", "http://x"))
            .with_model(ModelConfig::new("a", "http://y"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_question_set() {
        let err = TraitQaConfig::from_toml_str(
            "[[traits]]\nkind = \"height\"\nquestions = []",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Syntax(_)));
    }

    #[test]
    fn builder_methods() {
        let config = TraitQaConfig::new()
            .with_max_concurrent_rows(2)
            .with_retry_attempts(1)
            .with_cache_capacity(0);
        assert_eq!(config.max_concurrent_rows, 2);
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.cache_capacity, 0);
    }
}
