//! EmbeddingEngine: sanitization, truncation, caching, and dimension checks
//! around a single provider.

use kb_core::config::EmbeddingConfig;
use kb_core::errors::{EmbeddingError, KbResult};
use kb_core::traits::IEmbeddingProvider;
use tracing::{debug, info, warn};

use crate::cache::{content_key, L1MemoryCache};
use crate::providers;
use crate::sanitize::{sanitize, truncate_chars};

pub struct EmbeddingEngine {
    provider: Box<dyn IEmbeddingProvider>,
    cache: L1MemoryCache,
    dimensions: usize,
    max_input_chars: usize,
}

impl EmbeddingEngine {
    /// Build the engine around the provider named in `config`.
    pub fn from_config(config: &EmbeddingConfig) -> KbResult<Self> {
        let provider = providers::create_provider(config)?;
        Ok(Self::new(config, provider))
    }

    /// Wrap an already constructed provider.
    pub fn new(config: &EmbeddingConfig, provider: Box<dyn IEmbeddingProvider>) -> Self {
        info!(
            provider = provider.name(),
            dims = config.dimensions,
            max_input_chars = config.max_input_chars,
            "EmbeddingEngine initialized"
        );
        Self {
            provider,
            cache: L1MemoryCache::new(config.l1_cache_size),
            dimensions: config.dimensions,
            max_input_chars: config.max_input_chars,
        }
    }

    /// The exact text that would be sent to the provider for `text`.
    pub fn prepare(&self, text: &str) -> String {
        let clean = sanitize(text);
        truncate_chars(&clean, self.max_input_chars).to_string()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cached_entries(&self) -> u64 {
        self.cache.len()
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = self.prepare(text);
        if input.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let key = content_key(&input);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(hit);
        }

        let embedding = self.provider.embed(&input).map_err(|e| {
            warn!(provider = self.provider.name(), error = %e, "embedding failed");
            e
        })?;
        if embedding.len() != self.dimensions {
            warn!(
                provider = self.provider.name(),
                expected = self.dimensions,
                actual = embedding.len(),
                "embedding dimension mismatch"
            );
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        self.cache.insert(key, embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
