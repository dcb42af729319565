//! Insert, get, and lifecycle updates for dialogs.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use kb_core::errors::{KbError, KbResult};
use kb_core::models::{AnswerType, Confidence, Dialog};

use super::codec::{bytes_to_f32_vec, corrupt, f32_vec_to_bytes, fmt_ts, parse_opt_ts, parse_ts};
use crate::to_storage_err;

/// Column list matching [`row_to_dialog`].
pub(crate) const DIALOG_COLUMNS: &str = "id, question_text, question_embedding, question_category,
    question_hash, answer_text, answered_by, answer_type, was_helpful, confidence_score,
    used_count, requires_human_review, version, is_active, expires_at, is_duplicate_of,
    source_case_id, created_at, updated_at, last_used_at";

pub fn insert_dialog(conn: &Connection, dialog: &Dialog) -> KbResult<()> {
    let blob = dialog.question_embedding.as_deref().map(f32_vec_to_bytes);
    let dims = dialog.question_embedding.as_ref().map(|v| v.len() as i64);

    conn.execute(
        "INSERT INTO dialogs (
            id, question_text, question_embedding, embedding_dims, question_category,
            question_hash, answer_text, answered_by, answer_type, was_helpful,
            confidence_score, used_count, requires_human_review, version, is_active,
            expires_at, is_duplicate_of, source_case_id, created_at, updated_at, last_used_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
            ?19, ?20, ?21
        )",
        params![
            dialog.id,
            dialog.question_text,
            blob,
            dims,
            dialog.question_category,
            dialog.question_hash,
            dialog.answer_text,
            dialog.answered_by,
            dialog.answer_type.as_str(),
            dialog.was_helpful,
            dialog.confidence_score.value(),
            dialog.used_count as i64,
            dialog.requires_human_review,
            dialog.version,
            dialog.is_active,
            dialog.expires_at.map(fmt_ts),
            dialog.is_duplicate_of,
            dialog.source_case_id,
            fmt_ts(dialog.created_at),
            fmt_ts(dialog.updated_at),
            dialog.last_used_at.map(fmt_ts),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_dialog(conn: &Connection, id: &str) -> KbResult<Option<Dialog>> {
    let sql = format!("SELECT {DIALOG_COLUMNS} FROM dialogs WHERE id = ?1");
    conn.query_row(&sql, params![id], |row| Ok(row_to_dialog(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

/// The oldest active, canonical dialog with this hash that has not expired
/// at `now`.
pub fn find_canonical_by_hash(
    conn: &Connection,
    question_hash: &str,
    now: DateTime<Utc>,
) -> KbResult<Option<Dialog>> {
    let sql = format!(
        "SELECT {DIALOG_COLUMNS} FROM dialogs
         WHERE question_hash = ?1 AND is_active = 1 AND is_duplicate_of IS NULL
           AND (expires_at IS NULL OR expires_at > ?2)
         ORDER BY created_at ASC
         LIMIT 1"
    );
    conn.query_row(&sql, params![question_hash, fmt_ts(now)], |row| {
        Ok(row_to_dialog(row))
    })
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

/// Insert `dialog` as canonical, or as a duplicate without an embedding when a
/// live canonical already carries its hash. Lookup and insert share one
/// transaction. Returns the canonical id when linked.
pub fn insert_or_link_dialog(
    conn: &Connection,
    dialog: &Dialog,
    now: DateTime<Utc>,
) -> KbResult<Option<String>> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_or_link begin: {e}")))?;

    let canonical = find_canonical_by_hash(&tx, &dialog.question_hash, now)?
        .filter(|c| c.id != dialog.id)
        .map(|c| c.id);
    match &canonical {
        Some(canonical_id) => {
            let mut linked = dialog.clone();
            linked.is_duplicate_of = Some(canonical_id.clone());
            linked.question_embedding = None;
            insert_dialog(&tx, &linked)?;
        }
        None => insert_dialog(&tx, dialog)?,
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("insert_or_link commit: {e}")))?;
    Ok(canonical)
}

pub fn set_embedding(conn: &Connection, id: &str, embedding: &[f32]) -> KbResult<()> {
    let rows = conn
        .execute(
            "UPDATE dialogs SET question_embedding = ?2, embedding_dims = ?3, updated_at = ?4
             WHERE id = ?1",
            params![
                id,
                f32_vec_to_bytes(embedding),
                embedding.len() as i64,
                fmt_ts(Utc::now())
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    require_row(rows, id)
}

pub fn deactivate_dialog(conn: &Connection, id: &str) -> KbResult<()> {
    let rows = conn
        .execute(
            "UPDATE dialogs SET is_active = 0, version = version + 1, updated_at = ?2
             WHERE id = ?1",
            params![id, fmt_ts(Utc::now())],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    require_row(rows, id)
}

pub fn set_expiry(conn: &Connection, id: &str, expires_at: Option<DateTime<Utc>>) -> KbResult<()> {
    let rows = conn
        .execute(
            "UPDATE dialogs SET expires_at = ?2, version = version + 1, updated_at = ?3
             WHERE id = ?1",
            params![id, expires_at.map(fmt_ts), fmt_ts(Utc::now())],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    require_row(rows, id)
}

/// Atomic usage bump when a dialog is surfaced as an answer.
pub fn mark_used(conn: &Connection, id: &str) -> KbResult<()> {
    let now = fmt_ts(Utc::now());
    let rows = conn
        .execute(
            "UPDATE dialogs SET used_count = used_count + 1, last_used_at = ?2, updated_at = ?2
             WHERE id = ?1",
            params![id, now],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    require_row(rows, id)
}

/// Active canonical dialogs whose embedding is missing, oldest first.
pub fn dialogs_missing_embedding(conn: &Connection, limit: usize) -> KbResult<Vec<Dialog>> {
    let sql = format!(
        "SELECT {DIALOG_COLUMNS} FROM dialogs
         WHERE question_embedding IS NULL AND is_active = 1 AND is_duplicate_of IS NULL
         ORDER BY created_at ASC
         LIMIT ?1"
    );
    query_dialogs(conn, &sql, params![limit as i64])
}

/// Active dialogs flagged for review, lowest confidence first.
pub fn dialogs_requiring_review(conn: &Connection, limit: usize) -> KbResult<Vec<Dialog>> {
    let sql = format!(
        "SELECT {DIALOG_COLUMNS} FROM dialogs
         WHERE requires_human_review = 1 AND is_active = 1
         ORDER BY confidence_score ASC, updated_at DESC
         LIMIT ?1"
    );
    query_dialogs(conn, &sql, params![limit as i64])
}

pub(crate) fn query_dialogs(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> KbResult<Vec<Dialog>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_dialog(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn require_row(rows: usize, id: &str) -> KbResult<()> {
    if rows == 0 {
        return Err(KbError::DialogNotFound { id: id.to_string() });
    }
    Ok(())
}

/// Parse a row selected with [`DIALOG_COLUMNS`].
pub(crate) fn row_to_dialog(row: &Row<'_>) -> KbResult<Dialog> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());

    let blob: Option<Vec<u8>> = row.get(2).map_err(get_err)?;
    let answer_type_str: String = row.get(7).map_err(get_err)?;
    let answer_type = AnswerType::parse(&answer_type_str)
        .ok_or_else(|| corrupt("dialogs", format!("unknown answer_type '{answer_type_str}'")))?;
    let used_count: i64 = row.get(10).map_err(get_err)?;
    let created_at: String = row.get(17).map_err(get_err)?;
    let updated_at: String = row.get(18).map_err(get_err)?;

    Ok(Dialog {
        id: row.get(0).map_err(get_err)?,
        question_text: row.get(1).map_err(get_err)?,
        question_embedding: blob.as_deref().map(bytes_to_f32_vec),
        question_category: row.get(3).map_err(get_err)?,
        question_hash: row.get(4).map_err(get_err)?,
        answer_text: row.get(5).map_err(get_err)?,
        answered_by: row.get(6).map_err(get_err)?,
        answer_type,
        was_helpful: row.get(8).map_err(get_err)?,
        confidence_score: Confidence::new(row.get(9).map_err(get_err)?),
        used_count: used_count.max(0) as u64,
        requires_human_review: row.get(11).map_err(get_err)?,
        version: row.get(12).map_err(get_err)?,
        is_active: row.get(13).map_err(get_err)?,
        expires_at: parse_opt_ts("dialogs", row.get(14).map_err(get_err)?)?,
        is_duplicate_of: row.get(15).map_err(get_err)?,
        source_case_id: row.get(16).map_err(get_err)?,
        created_at: parse_ts("dialogs", &created_at)?,
        updated_at: parse_ts("dialogs", &updated_at)?,
        last_used_at: parse_opt_ts("dialogs", row.get(19).map_err(get_err)?)?,
    })
}
