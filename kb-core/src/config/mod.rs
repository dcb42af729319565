mod defaults;
mod embedding_config;
mod feedback_config;
mod observability_config;
mod retrieval_config;
mod solutions_config;
mod storage_config;

pub use embedding_config::EmbeddingConfig;
pub use feedback_config::FeedbackConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::{GateConfig, RetrievalConfig};
pub use solutions_config::SolutionsConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::automation::AutomationRule;
use crate::errors::{KbError, KbResult};

/// Top-level engine configuration. Every section falls back to its defaults
/// when absent, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub gate: GateConfig,
    pub feedback: FeedbackConfig,
    pub solutions: SolutionsConfig,
    pub observability: ObservabilityConfig,
    /// Automation rules evaluated against engine outcomes.
    pub automation: Vec<AutomationRule>,
}

impl KbConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(source: &str) -> KbResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| KbError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break engine invariants.
    pub fn validate(&self) -> KbResult<()> {
        let unit = |name: &str, v: f64| -> KbResult<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(KbError::Config {
                    reason: format!("{name} must be within [0, 1], got {v}"),
                })
            }
        };
        unit("retrieval.min_similarity", self.retrieval.min_similarity)?;
        unit("gate.min_similarity", self.gate.min_similarity)?;
        unit("gate.min_confidence", self.gate.min_confidence)?;
        unit("feedback.helpful_delta", self.feedback.helpful_delta)?;
        unit("feedback.not_helpful_delta", self.feedback.not_helpful_delta)?;
        unit("feedback.partially_delta", self.feedback.partially_delta)?;
        if self.embedding.dimensions == 0 {
            return Err(KbError::Config {
                reason: "embedding.dimensions must be positive".to_string(),
            });
        }
        Ok(())
    }
}
