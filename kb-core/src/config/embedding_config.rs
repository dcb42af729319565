use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `http`, `hashed`, or `disabled`.
    pub provider: String,
    /// Base URL of an OpenAI-compatible embeddings API.
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub dimensions: usize,
    /// Request timeout. A timeout is reported as a provider failure.
    pub timeout_ms: u64,
    /// Input is truncated to this many characters after sanitization.
    pub max_input_chars: usize,
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            base_url: defaults::DEFAULT_EMBEDDING_BASE_URL.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_EMBEDDING_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
            max_input_chars: defaults::DEFAULT_EMBEDDING_MAX_INPUT_CHARS,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
        }
    }
}
