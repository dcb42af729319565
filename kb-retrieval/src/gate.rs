//! Auto-answer decision over the single best match.
//!
//! Rules run in a fixed order against one snapshot of the candidate; the
//! first one that applies decides:
//!
//! 1. no candidate at or above the gate similarity: no match
//! 2. candidate explicitly marked not helpful: rejected
//! 3. confidence below the floor: rejected
//! 4. used fewer times than required: suggested to a human, answer returned
//! 5. otherwise: auto-answer

use serde::Serialize;
use tracing::debug;

use kb_core::config::GateConfig;
use kb_core::errors::KbResult;
use kb_core::traits::IDialogStore;

use crate::search::{percent, RankedDialog, SearchOptions, SimilaritySearch};

pub const REASON_NO_MATCH: &str = "no similar dialogs found";
pub const REASON_NOT_HELPFUL: &str = "best match was marked not helpful";
pub const REASON_LOW_CONFIDENCE: &str = "low confidence score";
pub const REASON_SUGGEST: &str = "not used enough times — suggest to human";
pub const REASON_AUTO: &str = "high confidence match with good history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    NoMatch,
    RejectedNotHelpful,
    LowConfidence,
    Suggest,
    AutoAnswer,
}

impl GateOutcome {
    pub fn reason(self) -> &'static str {
        match self {
            Self::NoMatch => REASON_NO_MATCH,
            Self::RejectedNotHelpful => REASON_NOT_HELPFUL,
            Self::LowConfidence => REASON_LOW_CONFIDENCE,
            Self::Suggest => REASON_SUGGEST,
            Self::AutoAnswer => REASON_AUTO,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AutoAnswerDecision {
    pub can_auto: bool,
    /// Similarity of the best candidate, two decimals; 0 with no candidate.
    pub confidence: f64,
    pub confidence_percent: String,
    /// Present for `Suggest` and `AutoAnswer` only.
    pub answer: Option<String>,
    pub dialog_id: Option<String>,
    pub reason: String,
    pub outcome: GateOutcome,
}

pub struct ConfidenceGate {
    config: GateConfig,
}

impl ConfidenceGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Search options used to find the gate candidate.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: 1,
            min_similarity: self.config.min_similarity,
            category: None,
            helpful_only: true,
            exclude_expired: true,
        }
    }

    /// Find the best candidate for `query` and decide.
    pub fn decide(&self, store: &dyn IDialogStore, query: &[f32]) -> KbResult<AutoAnswerDecision> {
        let mut hits = SimilaritySearch::new(store).search(query, &self.search_options())?;
        let best = if hits.is_empty() {
            None
        } else {
            Some(hits.swap_remove(0))
        };
        Ok(self.evaluate(best.as_ref()))
    }

    /// Apply the rule table to an already retrieved candidate.
    pub fn evaluate(&self, candidate: Option<&RankedDialog>) -> AutoAnswerDecision {
        let Some(best) = candidate.filter(|c| c.raw_similarity >= self.config.min_similarity)
        else {
            return decision(GateOutcome::NoMatch, 0.0, None);
        };

        // One read of each field; the candidate is an owned snapshot.
        let dialog = &best.dialog;
        let was_helpful = dialog.was_helpful;
        let confidence = dialog.confidence_score.value();
        let used_count = dialog.used_count;

        let outcome = if was_helpful == Some(false) {
            GateOutcome::RejectedNotHelpful
        } else if confidence < self.config.min_confidence {
            GateOutcome::LowConfidence
        } else if used_count < self.config.min_used_count {
            GateOutcome::Suggest
        } else {
            GateOutcome::AutoAnswer
        };

        debug!(
            dialog_id = %dialog.id,
            similarity = best.raw_similarity,
            confidence,
            used_count,
            ?outcome,
            "gate evaluated"
        );
        decision(outcome, best.raw_similarity, Some(best))
    }
}

fn decision(
    outcome: GateOutcome,
    similarity: f64,
    best: Option<&RankedDialog>,
) -> AutoAnswerDecision {
    let surfaced = matches!(outcome, GateOutcome::Suggest | GateOutcome::AutoAnswer);
    let (answer, dialog_id) = match best {
        Some(b) if surfaced => (Some(b.dialog.answer_text.clone()), Some(b.dialog.id.clone())),
        _ => (None, None),
    };
    AutoAnswerDecision {
        can_auto: outcome == GateOutcome::AutoAnswer,
        confidence: (similarity * 100.0).round() / 100.0,
        confidence_percent: percent(similarity),
        answer,
        dialog_id,
        reason: outcome.reason().to_string(),
        outcome,
    }
}
