//! v001: dialogs, dialog_feedback, feedback_daily_stats.

use rusqlite::Connection;

use kb_core::errors::KbResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> KbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS dialogs (
            id                    TEXT PRIMARY KEY,
            question_text         TEXT NOT NULL,
            question_embedding    BLOB,
            embedding_dims        INTEGER,
            question_category     TEXT,
            question_hash         TEXT NOT NULL,
            answer_text           TEXT NOT NULL,
            answered_by           TEXT NOT NULL,
            answer_type           TEXT NOT NULL CHECK (answer_type IN ('manual', 'automatic')),
            was_helpful           INTEGER,
            confidence_score      REAL NOT NULL DEFAULT 0.5
                                  CHECK (confidence_score >= 0.0 AND confidence_score <= 1.0),
            used_count            INTEGER NOT NULL DEFAULT 0 CHECK (used_count >= 0),
            requires_human_review INTEGER NOT NULL DEFAULT 0,
            version               INTEGER NOT NULL DEFAULT 1,
            is_active             INTEGER NOT NULL DEFAULT 1,
            expires_at            TEXT,
            is_duplicate_of       TEXT REFERENCES dialogs(id),
            source_case_id        TEXT,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL,
            last_used_at          TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_dialogs_hash ON dialogs(question_hash);
        CREATE INDEX IF NOT EXISTS idx_dialogs_category ON dialogs(question_category);
        CREATE INDEX IF NOT EXISTS idx_dialogs_searchable
            ON dialogs(is_active, is_duplicate_of, embedding_dims);
        CREATE INDEX IF NOT EXISTS idx_dialogs_review ON dialogs(requires_human_review);

        CREATE TABLE IF NOT EXISTS dialog_feedback (
            id          TEXT PRIMARY KEY,
            dialog_id   TEXT NOT NULL REFERENCES dialogs(id),
            rating      TEXT NOT NULL CHECK (rating IN ('helpful', 'not_helpful', 'partially')),
            comment     TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_dialog ON dialog_feedback(dialog_id);

        CREATE TABLE IF NOT EXISTS feedback_daily_stats (
            stat_date   TEXT NOT NULL,
            rating      TEXT NOT NULL,
            count       INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (stat_date, rating)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
