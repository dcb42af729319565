//! Auto-answer gate rule table.

use kb_core::config::GateConfig;
use kb_core::models::{Confidence, Dialog, NewDialog};
use kb_retrieval::gate::{REASON_AUTO, REASON_LOW_CONFIDENCE, REASON_NOT_HELPFUL, REASON_NO_MATCH, REASON_SUGGEST};
use kb_retrieval::{ConfidenceGate, GateOutcome, RankedDialog};
use proptest::prelude::*;

fn candidate(similarity: f64, confidence: f64, helpful: Option<bool>, used: u64) -> RankedDialog {
    let mut dialog = Dialog::from_new(
        &NewDialog::manual("How do I change my tariff?", "Open Billing > Tariff", "agent"),
        Some(vec![1.0, 0.0]),
    );
    dialog.confidence_score = Confidence::new(confidence);
    dialog.was_helpful = helpful;
    dialog.used_count = used;
    RankedDialog::new(dialog, similarity)
}

fn gate() -> ConfidenceGate {
    ConfidenceGate::new(GateConfig::default())
}

#[test]
fn g01_trusted_match_is_auto_answered() {
    let c = candidate(0.95, 0.6, Some(true), 5);
    let d = gate().evaluate(Some(&c));
    assert!(d.can_auto);
    assert_eq!(d.outcome, GateOutcome::AutoAnswer);
    assert_eq!(d.reason, REASON_AUTO);
    assert_eq!(d.confidence, 0.95);
    assert_eq!(d.confidence_percent, "95%");
    assert_eq!(d.answer.as_deref(), Some("Open Billing > Tariff"));
    assert_eq!(d.dialog_id.as_deref(), Some(c.dialog.id.as_str()));
}

#[test]
fn g02_rarely_used_match_is_suggested_with_answer() {
    let c = candidate(0.95, 0.6, Some(true), 1);
    let d = gate().evaluate(Some(&c));
    assert!(!d.can_auto);
    assert_eq!(d.outcome, GateOutcome::Suggest);
    assert_eq!(d.reason, REASON_SUGGEST);
    assert!(d.answer.is_some());
    assert!(d.dialog_id.is_some());
}

#[test]
fn g03_not_helpful_match_is_rejected_without_answer() {
    let c = candidate(0.95, 0.6, Some(false), 5);
    let d = gate().evaluate(Some(&c));
    assert!(!d.can_auto);
    assert_eq!(d.outcome, GateOutcome::RejectedNotHelpful);
    assert_eq!(d.reason, REASON_NOT_HELPFUL);
    assert!(d.answer.is_none());
    assert!(d.dialog_id.is_none());
}

#[test]
fn g04_low_confidence_is_rejected() {
    let c = candidate(0.99, 0.49, None, 10);
    let d = gate().evaluate(Some(&c));
    assert_eq!(d.outcome, GateOutcome::LowConfidence);
    assert_eq!(d.reason, REASON_LOW_CONFIDENCE);
    assert!(d.answer.is_none());
}

#[test]
fn g05_no_candidate_reports_zero_confidence() {
    let d = gate().evaluate(None);
    assert!(!d.can_auto);
    assert_eq!(d.outcome, GateOutcome::NoMatch);
    assert_eq!(d.reason, REASON_NO_MATCH);
    assert_eq!(d.confidence, 0.0);
}

#[test]
fn g06_not_helpful_wins_over_low_confidence() {
    let c = candidate(0.99, 0.1, Some(false), 0);
    assert_eq!(gate().evaluate(Some(&c)).outcome, GateOutcome::RejectedNotHelpful);
}

#[test]
fn g07_unrated_dialog_can_be_auto_answered() {
    let c = candidate(0.93, 0.5, None, 2);
    assert!(gate().evaluate(Some(&c)).can_auto);
}

#[test]
fn g08_threshold_applies_to_unrounded_similarity() {
    // 0.9196 displays as 0.92 but is below the bar.
    let c = candidate(0.9196, 0.9, Some(true), 10);
    let d = gate().evaluate(Some(&c));
    assert_eq!(d.outcome, GateOutcome::NoMatch);
}

proptest! {
    #[test]
    fn never_auto_below_similarity_floor(
        similarity in 0.0f64..0.92,
        confidence in 0.0f64..=1.0,
        used in 0u64..1000,
        helpful in prop::option::of(any::<bool>()),
    ) {
        let c = candidate(similarity, confidence, helpful, used);
        prop_assert!(!gate().evaluate(Some(&c)).can_auto);
    }

    #[test]
    fn suggestion_always_carries_answer(
        similarity in 0.92f64..=1.0,
        confidence in 0.5f64..=1.0,
        used in 0u64..2,
        helpful in prop_oneof![Just(None), Just(Some(true))],
    ) {
        let c = candidate(similarity, confidence, helpful, used);
        let d = gate().evaluate(Some(&c));
        prop_assert!(!d.can_auto);
        prop_assert!(d.answer.is_some());
    }
}
