//! Similarity search with over-fetch then threshold.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use kb_core::config::RetrievalConfig;
use kb_core::constants::SEARCH_OVERFETCH_FACTOR;
use kb_core::errors::{KbResult, RetrievalError};
use kb_core::models::Dialog;
use kb_core::traits::{IDialogStore, VectorQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub limit: usize,
    pub min_similarity: f64,
    pub category: Option<String>,
    /// Exclude dialogs explicitly marked not helpful.
    pub helpful_only: bool,
    pub exclude_expired: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl SearchOptions {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            limit: config.default_limit,
            min_similarity: config.min_similarity,
            category: None,
            helpful_only: config.helpful_only,
            exclude_expired: true,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.limit == 0 {
            return Err(RetrievalError::InvalidOptions {
                reason: "limit must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(RetrievalError::InvalidOptions {
                reason: format!("min_similarity {} outside [0, 1]", self.min_similarity),
            });
        }
        Ok(())
    }
}

/// A dialog that passed the similarity threshold.
#[derive(Debug, Clone, Serialize)]
pub struct RankedDialog {
    pub dialog: Dialog,
    /// Rounded to two decimals.
    pub similarity: f64,
    /// e.g. `"95%"`.
    pub similarity_percent: String,
    /// Unrounded value the threshold was applied to.
    #[serde(skip)]
    pub raw_similarity: f64,
}

impl RankedDialog {
    pub fn new(dialog: Dialog, raw_similarity: f64) -> Self {
        Self {
            dialog,
            similarity: (raw_similarity * 100.0).round() / 100.0,
            similarity_percent: percent(raw_similarity),
            raw_similarity,
        }
    }
}

/// `0.947 -> "95%"`.
pub fn percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

pub struct SimilaritySearch<'a> {
    store: &'a dyn IDialogStore,
}

impl<'a> SimilaritySearch<'a> {
    pub fn new(store: &'a dyn IDialogStore) -> Self {
        Self { store }
    }

    /// Nearest dialogs at or above `min_similarity`, best first, at most
    /// `limit`. Fetches `2 × limit` from the store before thresholding.
    pub fn search(&self, query: &[f32], opts: &SearchOptions) -> KbResult<Vec<RankedDialog>> {
        opts.validate()?;

        let fetch_limit = opts.limit.saturating_mul(SEARCH_OVERFETCH_FACTOR);
        let candidates = self.store.search_vector(&VectorQuery {
            embedding: query,
            fetch_limit,
            category: opts.category.as_deref(),
            helpful_only: opts.helpful_only,
            exclude_expired: opts.exclude_expired,
            now: Utc::now(),
        })?;
        let fetched = candidates.len();

        let results: Vec<RankedDialog> = candidates
            .into_iter()
            .filter(|(_, sim)| *sim >= opts.min_similarity)
            .take(opts.limit)
            .map(|(dialog, sim)| RankedDialog::new(dialog, sim))
            .collect();

        debug!(
            fetched,
            returned = results.len(),
            min_similarity = opts.min_similarity,
            "similarity search"
        );
        Ok(results)
    }
}
