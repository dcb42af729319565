//! File-backed engine: data survives reopen and migrations are idempotent.

use kb_core::models::{Dialog, NewDialog};
use kb_core::traits::IDialogStore;
use kb_core::config::StorageConfig;
use kb_storage::migrations::{current_version, LATEST_VERSION};
use kb_storage::pool::pragmas::verify_wal_mode;
use kb_storage::StorageEngine;

#[test]
fn dialogs_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.db");

    let dialog = Dialog::from_new(
        &NewDialog::manual("Where is my parcel?", "Tracking link sent", "agent"),
        Some(vec![0.5, 0.5]),
    );
    {
        let storage = StorageEngine::open(&path).unwrap();
        storage.insert_dialog(&dialog).unwrap();
    }

    let storage = StorageEngine::open(&path).unwrap();
    let got = storage.get_dialog(&dialog.id).unwrap().expect("persisted");
    assert_eq!(got.answer_text, "Tracking link sent");
    assert_eq!(got.question_embedding, Some(vec![0.5, 0.5]));

    let version = storage
        .pool()
        .writer
        .with_conn_sync(current_version)
        .unwrap();
    assert_eq!(version, LATEST_VERSION);
}

#[test]
fn read_pool_sees_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageEngine::open(&dir.path().join("kb.db")).unwrap();

    for i in 0..10 {
        let dialog = Dialog::from_new(&NewDialog::manual(format!("q{i}"), "a", "b"), None);
        storage.insert_dialog(&dialog).unwrap();
        assert!(storage.get_dialog(&dialog.id).unwrap().is_some());
    }
}

#[test]
fn file_mode_uses_wal_and_configured_pool() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        db_path: dir.path().join("kb.db").to_string_lossy().into_owned(),
        read_pool_size: 2,
        busy_timeout_ms: 1_000,
    };
    let storage = StorageEngine::open_with_config(&config).unwrap();

    let pool = storage.pool();
    assert!(pool.writer.with_conn_sync(verify_wal_mode).unwrap());
    assert_eq!(pool.readers.as_ref().map(|r| r.size()), Some(2));
}
