//! Dialog recording: dedup, embedding on write, degraded writes.

use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use kb_core::errors::EmbeddingError;
use kb_core::models::{AnswerType, NewDialog, ResolvedCase};
use kb_core::traits::{IDialogStore, IEmbeddingProvider, VectorQuery};
use kb_core::KbError;
use kb_embeddings::{DisabledProvider, HashedEmbeddingProvider};
use kb_learning::DialogRecorder;
use kb_storage::StorageEngine;

/// Panics if called; proves a path never reaches the provider.
struct MustNotEmbed;

impl IEmbeddingProvider for MustNotEmbed {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        panic!("provider must not be called");
    }
    fn dimensions(&self) -> usize {
        16
    }
    fn name(&self) -> &str {
        "must-not-embed"
    }
    fn is_available(&self) -> bool {
        true
    }
}

/// Hashed embeddings behind a fixed delay, widening the window between the
/// canonical lookup and the insert.
struct SlowProvider(HashedEmbeddingProvider);

impl IEmbeddingProvider for SlowProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        thread::sleep(Duration::from_millis(150));
        self.0.embed(text)
    }
    fn dimensions(&self) -> usize {
        self.0.dimensions()
    }
    fn name(&self) -> &str {
        "slow-hashed"
    }
    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn rec01_novel_question_is_embedded() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = HashedEmbeddingProvider::new(16);
    let recorder = DialogRecorder::new(&storage, &provider);

    let out = recorder
        .record(&NewDialog::manual("Where is my order?", "It ships tomorrow", "agent-7"))
        .unwrap();
    assert!(out.embedded);
    assert!(out.duplicate_of.is_none());
    let stored = storage.get_dialog(&out.dialog.id).unwrap().unwrap();
    assert_eq!(stored.question_embedding.map(|v| v.len()), Some(16));
}

#[test]
fn rec02_same_normalized_question_links_to_canonical() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = HashedEmbeddingProvider::new(16);
    let first = DialogRecorder::new(&storage, &provider)
        .record(&NewDialog::manual("Where is my order?", "Ships tomorrow", "a"))
        .unwrap();

    let recorder = DialogRecorder::new(&storage, &MustNotEmbed);
    let second = recorder
        .record(&NewDialog::manual("  where IS my order ", "Ships today", "b"))
        .unwrap();

    assert_eq!(second.duplicate_of.as_deref(), Some(first.dialog.id.as_str()));
    assert!(!second.embedded);
    let stored = storage.get_dialog(&second.dialog.id).unwrap().unwrap();
    assert_eq!(stored.is_duplicate_of.as_deref(), Some(first.dialog.id.as_str()));
    assert!(stored.question_embedding.is_none());
}

#[test]
fn rec03_provider_failure_stores_unembedded_dialog() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = DisabledProvider::new(16);
    let out = DialogRecorder::new(&storage, &provider)
        .record(&NewDialog::manual("Refund status", "Processed", "agent"))
        .unwrap();

    assert!(!out.embedded);
    assert_eq!(storage.dialogs_missing_embedding(10).unwrap().len(), 1);
}

#[test]
fn rec04_blank_input_is_rejected_before_provider() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let recorder = DialogRecorder::new(&storage, &MustNotEmbed);
    assert!(matches!(
        recorder.record(&NewDialog::manual("   ", "answer", "a")),
        Err(KbError::Validation { .. })
    ));
    assert!(matches!(
        recorder.record(&NewDialog::manual("question", " ", "a")),
        Err(KbError::Validation { .. })
    ));
}

#[test]
fn rec05_resolved_case_becomes_automatic_dialog() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = HashedEmbeddingProvider::new(16);
    let case = ResolvedCase {
        case_id: "case-981".into(),
        problem_text: "Orders are not syncing with the marketplace".into(),
        resolution_text: "Re-authorize the marketplace integration".into(),
        resolved_by: "agent-3".into(),
        category: Some("integrations".into()),
    };
    let out = DialogRecorder::new(&storage, &provider)
        .record_from_case(&case)
        .unwrap();

    let stored = storage.get_dialog(&out.dialog.id).unwrap().unwrap();
    assert_eq!(stored.answer_type, AnswerType::Automatic);
    assert_eq!(stored.source_case_id.as_deref(), Some("case-981"));
    assert_eq!(stored.question_category.as_deref(), Some("integrations"));
}

#[test]
fn rec06_deactivated_canonical_no_longer_absorbs_duplicates() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = HashedEmbeddingProvider::new(16);
    let recorder = DialogRecorder::new(&storage, &provider);
    let first = recorder
        .record(&NewDialog::manual("Change delivery address", "Via profile", "a"))
        .unwrap();
    recorder.deactivate(&first.dialog.id).unwrap();

    let second = recorder
        .record(&NewDialog::manual("change delivery address", "Via support", "b"))
        .unwrap();
    assert!(second.duplicate_of.is_none());
    assert!(second.embedded);
}

#[test]
fn rec07_expired_canonical_no_longer_absorbs_duplicates() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let provider = HashedEmbeddingProvider::new(16);
    let recorder = DialogRecorder::new(&storage, &provider);
    let first = recorder
        .record(&NewDialog::manual("Holiday opening hours", "9 to 5", "a"))
        .unwrap();
    recorder
        .expire(&first.dialog.id, Some(Utc::now() - ChronoDuration::hours(1)))
        .unwrap();

    let second = recorder
        .record(&NewDialog::manual("holiday opening hours?", "10 to 4", "b"))
        .unwrap();
    assert!(second.duplicate_of.is_none());
    assert!(second.embedded);

    let embedding = provider.embed("holiday opening hours").unwrap();
    let hits = storage
        .search_vector(&VectorQuery {
            embedding: &embedding,
            fetch_limit: 10,
            category: None,
            helpful_only: false,
            exclude_expired: true,
            now: Utc::now(),
        })
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|(d, _)| d.id.as_str()).collect();
    assert_eq!(ids, vec![second.dialog.id.as_str()]);
}

#[test]
fn rec08_concurrent_records_of_one_question_keep_a_single_canonical() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageEngine::open(&dir.path().join("kb.db")).unwrap();
    let provider = SlowProvider(HashedEmbeddingProvider::new(16));
    let barrier = Barrier::new(2);

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = ["Reset my password", "reset my password!"]
            .into_iter()
            .map(|question| {
                let (storage, provider, barrier) = (&storage, &provider, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    DialogRecorder::new(storage, provider)
                        .record(&NewDialog::manual(question, "Use the login page link", "a"))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let canonical: Vec<_> = outcomes.iter().filter(|o| o.duplicate_of.is_none()).collect();
    let linked: Vec<_> = outcomes.iter().filter(|o| o.duplicate_of.is_some()).collect();
    assert_eq!(canonical.len(), 1);
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].duplicate_of.as_deref(), Some(canonical[0].dialog.id.as_str()));
    assert!(!linked[0].embedded);

    let stored = storage.get_dialog(&linked[0].dialog.id).unwrap().unwrap();
    assert_eq!(stored.is_duplicate_of.as_deref(), Some(canonical[0].dialog.id.as_str()));
    assert!(stored.question_embedding.is_none());
}
