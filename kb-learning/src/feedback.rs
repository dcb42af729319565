//! Rating → confidence mutation, applied atomically by the store.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use kb_core::config::FeedbackConfig;
use kb_core::errors::{KbError, KbResult};
use kb_core::models::{DailyFeedbackStat, Dialog, DialogMutation, Feedback, Rating, SideEffect};
use kb_core::traits::IDialogStore;

/// Mutation for one rating.
///
/// - helpful: `+helpful_delta`, `was_helpful = true`, `used_count += 1`
/// - not_helpful: `-not_helpful_delta`, `was_helpful = false`, review flag
/// - partially: `-partially_delta`, review flag, helpfulness unchanged
pub fn mutation_for(rating: Rating, config: &FeedbackConfig) -> DialogMutation {
    match rating {
        Rating::Helpful => DialogMutation {
            confidence_delta: config.helpful_delta.abs(),
            set_was_helpful: Some(true),
            increment_used: true,
            require_review: false,
        },
        Rating::NotHelpful => DialogMutation {
            confidence_delta: -config.not_helpful_delta.abs(),
            set_was_helpful: Some(false),
            increment_used: false,
            require_review: true,
        },
        Rating::Partially => DialogMutation {
            confidence_delta: -config.partially_delta.abs(),
            set_was_helpful: None,
            increment_used: false,
            require_review: true,
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub feedback: Feedback,
    /// The dialog the mutation landed on, as it reads afterwards. Differs
    /// from the requested id when that id was a duplicate.
    pub dialog: Dialog,
    pub redirected_from: Option<String>,
    pub aggregate: SideEffect,
}

pub struct FeedbackAdapter<'a> {
    store: &'a dyn IDialogStore,
    config: FeedbackConfig,
}

impl<'a> FeedbackAdapter<'a> {
    pub fn new(store: &'a dyn IDialogStore, config: FeedbackConfig) -> Self {
        Self { store, config }
    }

    /// Log the feedback and adjust the dialog's confidence.
    ///
    /// Feedback on a duplicate is applied to its canonical dialog. The daily
    /// aggregate is updated afterwards and its failure is reported in the
    /// outcome, not returned as an error.
    pub fn apply_feedback(
        &self,
        dialog_id: &str,
        rating: Rating,
        comment: Option<String>,
    ) -> KbResult<FeedbackOutcome> {
        let target = self.resolve_canonical(dialog_id)?;
        let redirected_from = (target != dialog_id).then(|| dialog_id.to_string());

        let feedback = Feedback::new(&target, rating, comment);
        let mutation = mutation_for(rating, &self.config);
        let dialog = self.store.apply_feedback(&feedback, &mutation)?;

        info!(
            dialog_id = %dialog.id,
            rating = rating.as_str(),
            confidence = dialog.confidence_score.value(),
            requires_review = dialog.requires_human_review,
            "feedback applied"
        );

        let aggregate = match self
            .store
            .increment_daily_feedback(feedback.created_at.date_naive(), rating)
        {
            Ok(()) => SideEffect::Recorded,
            Err(e) => {
                warn!(error = %e, rating = rating.as_str(), "daily feedback aggregate not updated");
                SideEffect::Failed(e.to_string())
            }
        };

        Ok(FeedbackOutcome {
            feedback,
            dialog,
            redirected_from,
            aggregate,
        })
    }

    fn resolve_canonical(&self, dialog_id: &str) -> KbResult<String> {
        let dialog = self
            .store
            .get_dialog(dialog_id)?
            .ok_or_else(|| KbError::DialogNotFound {
                id: dialog_id.to_string(),
            })?;
        Ok(dialog.is_duplicate_of.unwrap_or(dialog.id))
    }

    /// Today's per-rating counters.
    pub fn today_stats(&self) -> KbResult<Vec<DailyFeedbackStat>> {
        self.store.daily_feedback_stats(Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpful_raises_and_counts_usage() {
        let m = mutation_for(Rating::Helpful, &FeedbackConfig::default());
        assert_eq!(m.confidence_delta, 0.05);
        assert_eq!(m.set_was_helpful, Some(true));
        assert!(m.increment_used);
        assert!(!m.require_review);
    }

    #[test]
    fn not_helpful_penalizes_and_flags() {
        let m = mutation_for(Rating::NotHelpful, &FeedbackConfig::default());
        assert_eq!(m.confidence_delta, -0.15);
        assert_eq!(m.set_was_helpful, Some(false));
        assert!(m.require_review);
    }

    #[test]
    fn partially_leaves_helpfulness_alone() {
        let m = mutation_for(Rating::Partially, &FeedbackConfig::default());
        assert_eq!(m.confidence_delta, -0.05);
        assert_eq!(m.set_was_helpful, None);
        assert!(!m.increment_used);
        assert!(m.require_review);
    }

    #[test]
    fn negative_config_values_keep_rating_direction() {
        let config = FeedbackConfig {
            helpful_delta: -0.1,
            not_helpful_delta: -0.2,
            partially_delta: 0.3,
        };
        assert!(mutation_for(Rating::Helpful, &config).confidence_delta > 0.0);
        assert!(mutation_for(Rating::NotHelpful, &config).confidence_delta < 0.0);
        assert!(mutation_for(Rating::Partially, &config).confidence_delta < 0.0);
    }
}
