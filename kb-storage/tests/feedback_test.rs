//! Feedback log, atomic confidence mutation, and daily aggregates.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use kb_core::models::{Confidence, Dialog, DialogMutation, Feedback, NewDialog, Rating};
use kb_core::traits::{IDialogStore, VectorQuery};
use kb_core::KbError;
use kb_storage::StorageEngine;

fn seed(storage: &StorageEngine) -> Dialog {
    let dialog = Dialog::from_new(
        &NewDialog::manual("Payment failed", "Retry with another card", "agent"),
        Some(vec![1.0, 0.0]),
    );
    storage.insert_dialog(&dialog).unwrap();
    dialog
}

fn mutation(delta: f64, helpful: Option<bool>, used: bool, review: bool) -> DialogMutation {
    DialogMutation {
        confidence_delta: delta,
        set_was_helpful: helpful,
        increment_used: used,
        require_review: review,
    }
}

#[test]
fn feedback_is_logged_and_mutation_applied() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = seed(&storage);

    let fb = Feedback::new(&dialog.id, Rating::Helpful, Some("thanks".into()));
    let updated = storage
        .apply_feedback(&fb, &mutation(0.05, Some(true), true, false))
        .unwrap();

    assert!((updated.confidence_score.value() - 0.55).abs() < 1e-9);
    assert_eq!(updated.was_helpful, Some(true));
    assert_eq!(updated.used_count, 1);
    assert!(updated.last_used_at.is_some());

    let log = storage.feedback_for_dialog(&dialog.id).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].rating, Rating::Helpful);
    assert_eq!(log[0].comment.as_deref(), Some("thanks"));
}

#[test]
fn confidence_is_clamped_at_both_ends() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = seed(&storage);

    for _ in 0..20 {
        let fb = Feedback::new(&dialog.id, Rating::Helpful, None);
        storage
            .apply_feedback(&fb, &mutation(0.05, Some(true), true, false))
            .unwrap();
    }
    let top = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(top.confidence_score.value(), 1.0);

    for _ in 0..10 {
        let fb = Feedback::new(&dialog.id, Rating::NotHelpful, None);
        storage
            .apply_feedback(&fb, &mutation(-0.15, Some(false), false, true))
            .unwrap();
    }
    let bottom = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(bottom.confidence_score.value(), 0.0);
    assert!(bottom.requires_human_review);
    assert_eq!(bottom.was_helpful, Some(false));
}

#[test]
fn repeated_deltas_do_not_drift() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let mut dialog = Dialog::from_new(&NewDialog::manual("q", "a", "b"), None);
    dialog.confidence_score = Confidence::new(0.95);
    storage.insert_dialog(&dialog).unwrap();

    for _ in 0..3 {
        let fb = Feedback::new(&dialog.id, Rating::NotHelpful, None);
        storage
            .apply_feedback(&fb, &mutation(-0.15, Some(false), false, true))
            .unwrap();
    }
    let got = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(got.confidence_score.value(), 0.5);
}

#[test]
fn partial_feedback_keeps_previous_helpfulness() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = seed(&storage);

    let fb = Feedback::new(&dialog.id, Rating::Helpful, None);
    storage
        .apply_feedback(&fb, &mutation(0.05, Some(true), true, false))
        .unwrap();
    let fb = Feedback::new(&dialog.id, Rating::Partially, None);
    let updated = storage
        .apply_feedback(&fb, &mutation(-0.05, None, false, false))
        .unwrap();

    assert_eq!(updated.was_helpful, Some(true));
    assert!((updated.confidence_score.value() - 0.5).abs() < 1e-9);
    assert_eq!(updated.used_count, 1);
}

#[test]
fn feedback_for_missing_dialog_writes_nothing() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let fb = Feedback::new("ghost", Rating::Helpful, None);
    let err = storage
        .apply_feedback(&fb, &mutation(0.05, Some(true), true, false))
        .unwrap_err();
    assert!(matches!(err, KbError::DialogNotFound { .. }));
    assert!(storage.feedback_for_dialog("ghost").unwrap().is_empty());
}

#[test]
fn not_helpful_dialogs_leave_helpful_only_search() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = seed(&storage);
    let fb = Feedback::new(&dialog.id, Rating::NotHelpful, None);
    storage
        .apply_feedback(&fb, &mutation(-0.15, Some(false), false, true))
        .unwrap();

    let q = VectorQuery {
        embedding: &[1.0, 0.0],
        fetch_limit: 10,
        category: None,
        helpful_only: true,
        exclude_expired: true,
        now: Utc::now(),
    };
    assert!(storage.search_vector(&q).unwrap().is_empty());

    let q = VectorQuery {
        helpful_only: false,
        ..q
    };
    assert_eq!(storage.search_vector(&q).unwrap().len(), 1);
}

#[test]
fn daily_aggregate_counts_per_rating() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let today = Utc::now().date_naive();

    storage.increment_daily_feedback(today, Rating::Helpful).unwrap();
    storage.increment_daily_feedback(today, Rating::Helpful).unwrap();
    storage.increment_daily_feedback(today, Rating::NotHelpful).unwrap();

    let stats = storage.daily_feedback_stats(today).unwrap();
    let helpful = stats.iter().find(|s| s.rating == Rating::Helpful).unwrap();
    let not_helpful = stats.iter().find(|s| s.rating == Rating::NotHelpful).unwrap();
    assert_eq!(helpful.count, 2);
    assert_eq!(not_helpful.count, 1);
    assert!(stats.iter().all(|s| s.rating != Rating::Partially));

    let yesterday = today.pred_opt().unwrap();
    assert!(storage.daily_feedback_stats(yesterday).unwrap().is_empty());
}

#[test]
fn concurrent_feedback_loses_no_updates() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(StorageEngine::open(&dir.path().join("kb.db")).unwrap());
    let dialog = seed(&storage);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let storage = Arc::clone(&storage);
            let id = dialog.id.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    let fb = Feedback::new(&id, Rating::Helpful, None);
                    storage
                        .apply_feedback(&fb, &mutation(0.01, Some(true), true, false))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let got = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(got.used_count, 40);
    assert!((got.confidence_score.value() - 0.9).abs() < 1e-9);
    assert_eq!(storage.feedback_for_dialog(&dialog.id).unwrap().len(), 40);
}
