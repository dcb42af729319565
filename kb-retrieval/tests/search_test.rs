//! Similarity search and gate against a real store.

use kb_core::config::GateConfig;
use kb_core::models::{Dialog, DialogMutation, Feedback, NewDialog, Rating};
use kb_core::traits::IDialogStore;
use kb_retrieval::{ConfidenceGate, GateOutcome, SearchOptions, SimilaritySearch};
use kb_storage::StorageEngine;

/// Unit vector at `angle` radians; cosine between two is cos(Δangle).
fn at_angle(angle: f64) -> Vec<f32> {
    vec![angle.cos() as f32, angle.sin() as f32]
}

fn insert(storage: &StorageEngine, question: &str, embedding: Vec<f32>) -> Dialog {
    let dialog = Dialog::from_new(&NewDialog::manual(question, "answer", "agent"), Some(embedding));
    storage.insert_dialog(&dialog).unwrap();
    dialog
}

#[test]
fn s01_threshold_filters_after_overfetch() {
    let storage = StorageEngine::open_in_memory().unwrap();
    insert(&storage, "close", at_angle(0.1)); // cos ≈ 0.995
    insert(&storage, "medium", at_angle(0.6)); // cos ≈ 0.825
    insert(&storage, "far", at_angle(1.2)); // cos ≈ 0.362

    let hits = SimilaritySearch::new(&storage)
        .search(&at_angle(0.0), &SearchOptions::default())
        .unwrap();
    let questions: Vec<&str> = hits.iter().map(|h| h.dialog.question_text.as_str()).collect();
    assert_eq!(questions, vec!["close", "medium"]);
    assert_eq!(hits[0].similarity, 1.0);
    assert_eq!(hits[0].similarity_percent, "100%");
    assert_eq!(hits[1].similarity, 0.83);
}

#[test]
fn s02_limit_truncates() {
    let storage = StorageEngine::open_in_memory().unwrap();
    for i in 0..8 {
        insert(&storage, &format!("q{i}"), at_angle(0.01 * i as f64));
    }
    let hits = SimilaritySearch::new(&storage)
        .search(&at_angle(0.0), &SearchOptions::default().with_limit(3))
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].dialog.question_text, "q0");
}

#[test]
fn s03_empty_corpus_is_empty_result() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let hits = SimilaritySearch::new(&storage)
        .search(&at_angle(0.0), &SearchOptions::default())
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn s04_category_is_exact() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let billing = Dialog::from_new(
        &NewDialog::manual("refund", "a", "b").with_category("billing"),
        Some(at_angle(0.0)),
    );
    storage.insert_dialog(&billing).unwrap();
    insert(&storage, "other", at_angle(0.0));

    let hits = SimilaritySearch::new(&storage)
        .search(&at_angle(0.0), &SearchOptions::default().with_category("billing"))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].dialog.id, billing.id);
}

#[test]
fn s05_gate_uses_higher_similarity_bar() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let d = insert(&storage, "close enough for search", at_angle(0.5)); // cos ≈ 0.878
    for _ in 0..3 {
        storage.mark_used(&d.id).unwrap();
    }

    let gate = ConfidenceGate::new(GateConfig::default());
    let decision = gate.decide(&storage, &at_angle(0.0)).unwrap();
    assert_eq!(decision.outcome, GateOutcome::NoMatch);
    assert_eq!(decision.confidence, 0.0);

    let hits = SimilaritySearch::new(&storage)
        .search(&at_angle(0.0), &SearchOptions::default())
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn s06_gate_auto_answers_used_trusted_match() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let d = insert(&storage, "tariff", at_angle(0.1));
    storage.mark_used(&d.id).unwrap();

    let gate = ConfidenceGate::new(GateConfig::default());
    let first = gate.decide(&storage, &at_angle(0.0)).unwrap();
    assert_eq!(first.outcome, GateOutcome::Suggest);
    assert_eq!(first.dialog_id.as_deref(), Some(d.id.as_str()));

    storage.mark_used(&d.id).unwrap();
    let second = gate.decide(&storage, &at_angle(0.0)).unwrap();
    assert!(second.can_auto);
}

#[test]
fn s07_gate_skips_dialogs_marked_not_helpful() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let d = insert(&storage, "bad answer", at_angle(0.0));
    let fb = Feedback::new(&d.id, Rating::NotHelpful, None);
    storage
        .apply_feedback(
            &fb,
            &DialogMutation {
                confidence_delta: -0.15,
                set_was_helpful: Some(false),
                increment_used: false,
                require_review: true,
            },
        )
        .unwrap();

    let gate = ConfidenceGate::new(GateConfig::default());
    let decision = gate.decide(&storage, &at_angle(0.0)).unwrap();
    assert!(!decision.can_auto);
    assert!(decision.answer.is_none());
}
