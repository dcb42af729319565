//! Dialog insert, lookup, dedup hash, and lifecycle updates.

use chrono::{Duration, Utc};
use kb_core::models::{Dialog, NewDialog};
use kb_core::traits::IDialogStore;
use kb_core::KbError;
use kb_storage::StorageEngine;

fn make_dialog(question: &str, embedding: Option<Vec<f32>>) -> Dialog {
    let new = NewDialog::manual(question, format!("answer to {question}"), "agent-1");
    Dialog::from_new(&new, embedding)
}

#[test]
fn insert_then_get_roundtrips_all_fields() {
    let storage = StorageEngine::open_in_memory().expect("storage");
    let mut dialog = make_dialog("How do I reset my password?", Some(vec![0.1, 0.2, 0.3]));
    dialog.question_category = Some("account".into());
    dialog.source_case_id = Some("case-42".into());
    storage.insert_dialog(&dialog).expect("insert");

    let got = storage.get_dialog(&dialog.id).expect("get").expect("present");
    assert_eq!(got.question_text, dialog.question_text);
    assert_eq!(got.question_embedding, Some(vec![0.1, 0.2, 0.3]));
    assert_eq!(got.question_category.as_deref(), Some("account"));
    assert_eq!(got.source_case_id.as_deref(), Some("case-42"));
    assert_eq!(got.confidence_score.value(), 0.5);
    assert_eq!(got.used_count, 0);
    assert_eq!(got.was_helpful, None);
    assert!(got.is_active);
    assert_eq!(got.version, 1);
}

#[test]
fn get_missing_dialog_is_none() {
    let storage = StorageEngine::open_in_memory().unwrap();
    assert!(storage.get_dialog("nope").unwrap().is_none());
}

#[test]
fn canonical_lookup_ignores_duplicates_and_inactive() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let canonical = make_dialog("Where is my order?", None);
    storage.insert_dialog(&canonical).unwrap();

    let mut dup = make_dialog("where is my ORDER", None);
    dup.is_duplicate_of = Some(canonical.id.clone());
    storage.insert_dialog(&dup).unwrap();
    assert_eq!(dup.question_hash, canonical.question_hash);

    let found = storage
        .find_canonical_by_hash(&canonical.question_hash, Utc::now())
        .unwrap()
        .expect("canonical");
    assert_eq!(found.id, canonical.id);

    storage.deactivate_dialog(&canonical.id).unwrap();
    assert!(storage
        .find_canonical_by_hash(&canonical.question_hash, Utc::now())
        .unwrap()
        .is_none());
}

#[test]
fn canonical_lookup_skips_expired_dialogs() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = make_dialog("Holiday opening hours", None);
    storage.insert_dialog(&dialog).unwrap();
    let now = Utc::now();
    storage.set_expiry(&dialog.id, Some(now + Duration::hours(1))).unwrap();

    assert!(storage
        .find_canonical_by_hash(&dialog.question_hash, now)
        .unwrap()
        .is_some());
    assert!(storage
        .find_canonical_by_hash(&dialog.question_hash, now + Duration::hours(2))
        .unwrap()
        .is_none());
}

#[test]
fn insert_or_link_stores_second_copy_as_duplicate() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let first = make_dialog("Where is my order?", Some(vec![0.1, 0.2]));
    let second = make_dialog("where is my order", Some(vec![0.3, 0.4]));

    assert_eq!(storage.insert_or_link_dialog(&first, Utc::now()).unwrap(), None);
    let linked = storage.insert_or_link_dialog(&second, Utc::now()).unwrap();
    assert_eq!(linked.as_deref(), Some(first.id.as_str()));

    let stored = storage.get_dialog(&second.id).unwrap().unwrap();
    assert_eq!(stored.is_duplicate_of.as_deref(), Some(first.id.as_str()));
    assert!(stored.question_embedding.is_none());
    let canonical = storage.get_dialog(&first.id).unwrap().unwrap();
    assert_eq!(canonical.question_embedding, Some(vec![0.1, 0.2]));
}

#[test]
fn set_embedding_fills_missing_vector() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = make_dialog("Invoice is wrong", None);
    storage.insert_dialog(&dialog).unwrap();

    let missing = storage.dialogs_missing_embedding(10).unwrap();
    assert_eq!(missing.len(), 1);

    storage.set_embedding(&dialog.id, &[1.0, 0.0]).unwrap();
    assert!(storage.dialogs_missing_embedding(10).unwrap().is_empty());
    let got = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(got.question_embedding, Some(vec![1.0, 0.0]));
}

#[test]
fn lifecycle_updates_on_missing_dialog_fail_with_not_found() {
    let storage = StorageEngine::open_in_memory().unwrap();
    assert!(matches!(
        storage.mark_used("ghost"),
        Err(KbError::DialogNotFound { .. })
    ));
    assert!(matches!(
        storage.deactivate_dialog("ghost"),
        Err(KbError::DialogNotFound { .. })
    ));
    assert!(matches!(
        storage.set_expiry("ghost", None),
        Err(KbError::DialogNotFound { .. })
    ));
}

#[test]
fn mark_used_increments_and_stamps() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = make_dialog("Delivery delayed", None);
    storage.insert_dialog(&dialog).unwrap();

    storage.mark_used(&dialog.id).unwrap();
    storage.mark_used(&dialog.id).unwrap();

    let got = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(got.used_count, 2);
    assert!(got.last_used_at.is_some());
}

#[test]
fn set_expiry_bumps_version() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let dialog = make_dialog("Promo code", None);
    storage.insert_dialog(&dialog).unwrap();

    let when = Utc::now() + Duration::days(7);
    storage.set_expiry(&dialog.id, Some(when)).unwrap();

    let got = storage.get_dialog(&dialog.id).unwrap().unwrap();
    assert_eq!(got.version, 2);
    let stored = got.expires_at.expect("expiry");
    assert!((stored - when).num_milliseconds().abs() < 1);
}
