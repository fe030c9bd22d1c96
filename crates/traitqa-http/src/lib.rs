//! TraitQA HTTP backend
//!
//! Question answering served over HTTP. The endpoint receives
//! `{"question": ..., "context": ...}` as JSON and answers with
//! `{"answer": ..., "score": ...}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use traitqa_core::{ModelConfig, QaCapability};
//! use traitqa_http::HttpQaBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpQaBackend::from_config(&ModelConfig::new("roberta", "http://localhost:8080/qa"))?;
//! let reply = backend.infer("How tall is the plant?", "Shrub to 2 m tall.").await?;
//! println!("{} ({})", reply.answer, reply.score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use traitqa_core::{ModelConfig, QaAnswer, QaCapability, QaError};

/// Errors building an HTTP backend
#[derive(Debug, thiserror::Error)]
pub enum HttpQaError {
    /// Endpoint is not an http(s) URL
    #[error("invalid endpoint: '{0}'")]
    InvalidEndpoint(String),

    /// Configured API key variable is not set
    #[error("environment variable '{0}' is not set")]
    MissingApiKey(String),

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct InferRequest<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Deserialize)]
struct InferResponse {
    answer: String,
    score: f64,
}

/// QA capability backed by an HTTP inference endpoint
#[derive(Debug, Clone)]
pub struct HttpQaBackend {
    client: Client,
    endpoint: String,
    timeout: Duration,
    api_key: Option<String>,
}

impl HttpQaBackend {
    /// Create backend for `endpoint` with a per-request timeout
    ///
    /// # Errors
    /// - `HttpQaError::InvalidEndpoint` unless the URL is http(s)
    /// - `HttpQaError::Client` if the client cannot be built
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, HttpQaError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HttpQaError::InvalidEndpoint(endpoint));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            timeout,
            api_key: None,
        })
    }

    /// Create backend from model settings, reading the API key if configured
    ///
    /// # Errors
    /// As [`HttpQaBackend::new`], plus `HttpQaError::MissingApiKey`
    pub fn from_config(config: &ModelConfig) -> Result<Self, HttpQaError> {
        let backend = Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))?;
        match &config.api_key_env {
            Some(var) => {
                let key = std::env::var(var).map_err(|_| HttpQaError::MissingApiKey(var.clone()))?;
                Ok(backend.with_api_key(key))
            }
            None => Ok(backend),
        }
    }

    /// With bearer token
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, error: &reqwest::Error) -> QaError {
        if error.is_timeout() {
            QaError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else if error.is_decode() {
            QaError::InvalidResponse(error.to_string())
        } else {
            QaError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl QaCapability for HttpQaBackend {
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&InferRequest { question, context });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(endpoint = %self.endpoint, %status, "inference request failed");
            return Err(status_error(status, body));
        }

        let reply: InferResponse = response.json().await.map_err(|e| self.transport_error(&e))?;
        if !(0.0..=1.0).contains(&reply.score) {
            return Err(QaError::InvalidResponse(format!(
                "score out of range: {}",
                reply.score
            )));
        }

        tracing::debug!(question, answer = %reply.answer, score = reply.score, "inference");
        Ok(QaAnswer::new(reply.answer, reply.score))
    }
}

/// Server errors and throttling may clear up; other statuses will not
fn status_error(status: StatusCode, body: String) -> QaError {
    let message = format!("{status}: {body}");
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        QaError::Transport(message)
    } else {
        QaError::Backend(message)
    }
}
