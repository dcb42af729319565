//! OpenAI-compatible embeddings endpoint over a blocking HTTP client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kb_core::config::EmbeddingConfig;
use kb_core::errors::{EmbeddingError, KbError, KbResult};
use kb_core::traits::IEmbeddingProvider;

const PROVIDER_NAME: &str = "http";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// `POST {base_url}/embeddings` with a bounded timeout. One attempt per call.
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    timeout_ms: u64,
}

impl HttpEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig, api_key: Option<String>) -> KbResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| KbError::Config {
                reason: format!("build embedding http client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                provider: PROVIDER_NAME.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else if e.is_connect() {
            EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: e.to_string(),
            }
        }
    }
}

impl IEmbeddingProvider for HttpEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model,
            input: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().map_err(|e| self.map_send_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(EmbeddingError::RequestFailed {
                reason: format!("embeddings API returned {status}: {body}"),
            });
        }

        let body: EmbedResponse = resp.json().map_err(|e| self.map_send_error(e))?;
        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::RequestFailed {
                reason: "embeddings API returned no data".to_string(),
            })?;
        debug!(dims = embedding.len(), "http embedding received");
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        true
    }
}
