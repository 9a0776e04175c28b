//! Remote embedding client
//!
//! Speaks the Ollama `/api/embed` protocol: the request carries the model
//! name and a one-element `input` list, the response an `embeddings` list
//! whose first element is the vector.

use crate::EmbeddingClient;
use async_trait::async_trait;
use magicsearch_core::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://llm.lab.sspcloud.fr/ollama/api/embed";
pub const DEFAULT_MODEL: &str = "bge-m3:latest";

/// Connection settings for [`HttpEmbeddingClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    /// L2-normalize returned vectors
    pub normalize: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            normalize: false,
        }
    }
}

impl EmbeddingConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

pub struct HttpEmbeddingClient {
    config: EmbeddingConfig,
    client: reqwest::Client,
}

impl HttpEmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::EmbeddingUnavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    async fn vectorize(&self, text: &str) -> Result<Vector> {
        let body = EmbedRequest {
            model: &self.config.model,
            input: [text],
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::EmbeddingUnavailable(format!(
                    "request timed out after {:?}",
                    self.config.timeout
                ))
            } else {
                Error::EmbeddingUnavailable(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("Embedding endpoint returned {}: {}", status, detail);
            return Err(Error::EmbeddingUnavailable(format!(
                "endpoint returned {}: {}",
                status, detail
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("malformed response: {}", e)))?;

        let data = parsed
            .embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::EmbeddingUnavailable("response carried no embedding".to_string())
            })?;

        let mut vector = Vector::new(data);
        if self.config.normalize {
            vector.normalize();
        }
        tracing::debug!("Embedded {} chars into {} dims", text.len(), vector.dim());
        Ok(vector)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
