use serde::{Deserialize, Serialize};

use crate::constants;

/// Keyword relevance scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionsConfig {
    pub default_limit: usize,
    pub min_score: f64,
    pub max_keywords: usize,
    pub fallback_confidence: u8,
}

impl Default for SolutionsConfig {
    fn default() -> Self {
        Self {
            default_limit: constants::DEFAULT_SEARCH_LIMIT,
            min_score: constants::SOLUTION_MIN_SCORE,
            max_keywords: constants::MAX_KEYWORDS,
            fallback_confidence: constants::SOLUTION_FALLBACK_CONFIDENCE,
        }
    }
}
