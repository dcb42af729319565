//! Provider construction from configuration.

pub mod hashed_provider;
pub mod http_provider;

pub use hashed_provider::HashedEmbeddingProvider;
pub use http_provider::HttpEmbeddingProvider;

use kb_core::config::EmbeddingConfig;
use kb_core::errors::{EmbeddingError, KbError, KbResult};
use kb_core::traits::IEmbeddingProvider;
use tracing::{info, warn};

/// Build the provider named by `config.provider`.
///
/// `http` reads its API key from the environment variable named by
/// `config.api_key_env`; a missing key is allowed for servers that do not
/// require one.
pub fn create_provider(config: &EmbeddingConfig) -> KbResult<Box<dyn IEmbeddingProvider>> {
    match config.provider.as_str() {
        "http" => {
            let api_key = std::env::var(&config.api_key_env).ok();
            if api_key.is_none() {
                warn!(env = %config.api_key_env, "embedding API key not set");
            }
            let provider = HttpEmbeddingProvider::new(config, api_key)?;
            info!(base_url = %config.base_url, model = %config.model, "http embedding provider");
            Ok(Box::new(provider))
        }
        "hashed" => Ok(Box::new(HashedEmbeddingProvider::new(config.dimensions))),
        "disabled" => Ok(Box::new(DisabledProvider::new(config.dimensions))),
        other => Err(KbError::Config {
            reason: format!("unknown embedding provider '{other}'"),
        }),
    }
}

/// Provider for deployments without embeddings; every call fails, so the
/// service always takes the keyword path.
pub struct DisabledProvider {
    dimensions: usize,
}

impl DisabledProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl IEmbeddingProvider for DisabledProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: self.name().to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }
}
