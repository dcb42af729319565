//! Forward-only schema migrations tracked in `schema_version`.

mod v001_dialog_tables;
mod v002_solution_tables;

use rusqlite::{params, Connection};

use kb_core::errors::{KbError, KbResult, StorageError};
use tracing::info;

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> KbResult<()>;

const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_dialog_tables::migrate),
    (2, v002_solution_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> KbResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration begin: {e}")))?;
        migrate(&tx).map_err(|e| {
            KbError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![version, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration commit: {e}")))?;
        info!(version, "applied schema migration");
    }

    current_version(conn)
}

/// Highest applied migration, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> KbResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
