use serde::{Deserialize, Serialize};

use crate::constants;

/// Suggestion search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    pub min_similarity: f64,
    pub helpful_only: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: constants::DEFAULT_SEARCH_LIMIT,
            min_similarity: constants::DEFAULT_MIN_SIMILARITY,
            helpful_only: true,
        }
    }
}

/// Auto-answer gate thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub min_similarity: f64,
    pub min_confidence: f64,
    pub min_used_count: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_similarity: constants::AUTO_ANSWER_MIN_SIMILARITY,
            min_confidence: constants::AUTO_ANSWER_MIN_CONFIDENCE,
            min_used_count: constants::AUTO_ANSWER_MIN_USED_COUNT,
        }
    }
}
