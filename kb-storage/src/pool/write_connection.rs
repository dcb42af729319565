//! The single serialized write connection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use kb_core::errors::KbResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Default busy timeout for in-memory connections.
const IN_MEMORY_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Exclusive write access. SQLite allows one writer at a time; holding the
/// mutex for the whole closure keeps each read-modify-write sequence atomic
/// with respect to other writers in this process.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u64) -> KbResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> KbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, IN_MEMORY_BUSY_TIMEOUT_MS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the write connection held.
    pub fn with_conn_sync<F, T>(&self, f: F) -> KbResult<T>
    where
        F: FnOnce(&Connection) -> KbResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
