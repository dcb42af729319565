//! # kb-storage
//!
//! SQLite persistence for the knowledge engine: dialog corpus with embeddings,
//! immutable feedback log, daily feedback aggregates, and the solutions catalog.
//! One serialized writer plus a read pool in file-backed mode.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use kb_core::errors::{KbError, StorageError};

/// Map any displayable error into a storage `KbError`.
pub(crate) fn to_storage_err(message: impl Into<String>) -> KbError {
    KbError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}
