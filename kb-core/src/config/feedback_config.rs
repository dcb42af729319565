use serde::{Deserialize, Serialize};

use super::defaults;

/// Confidence adjustments applied per feedback rating.
///
/// Deltas are magnitudes; the sign comes from the rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub helpful_delta: f64,
    pub not_helpful_delta: f64,
    pub partially_delta: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            helpful_delta: defaults::DEFAULT_HELPFUL_DELTA,
            not_helpful_delta: defaults::DEFAULT_NOT_HELPFUL_DELTA,
            partially_delta: defaults::DEFAULT_PARTIALLY_DELTA,
        }
    }
}
