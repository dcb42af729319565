//! v002: solutions catalog.

use rusqlite::Connection;

use kb_core::errors::KbResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> KbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS solutions (
            id                     TEXT PRIMARY KEY,
            category               TEXT NOT NULL,
            subcategory            TEXT,
            problem_keywords       TEXT NOT NULL DEFAULT '[]',
            problem_pattern        TEXT NOT NULL,
            solution_text          TEXT NOT NULL,
            solution_steps         TEXT NOT NULL DEFAULT '[]',
            success_score          INTEGER NOT NULL DEFAULT 3
                                   CHECK (success_score BETWEEN 1 AND 5),
            used_count             INTEGER NOT NULL DEFAULT 0,
            helpful_votes          INTEGER NOT NULL DEFAULT 0,
            not_helpful_votes      INTEGER NOT NULL DEFAULT 0,
            is_verified            INTEGER NOT NULL DEFAULT 0,
            is_active              INTEGER NOT NULL DEFAULT 1,
            avg_resolution_minutes REAL,
            created_at             TEXT NOT NULL,
            updated_at             TEXT NOT NULL,
            last_used_at           TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_solutions_category ON solutions(category, is_active);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
