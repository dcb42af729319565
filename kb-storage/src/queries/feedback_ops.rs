//! Feedback log, atomic confidence mutation, and daily aggregates.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};

use kb_core::errors::{KbError, KbResult};
use kb_core::models::{DailyFeedbackStat, Dialog, DialogMutation, Feedback, Rating};

use super::codec::{corrupt, fmt_ts, parse_ts};
use super::dialog_crud::get_dialog;
use crate::to_storage_err;

/// Insert the feedback row and apply `mutation` to its dialog in one
/// transaction. The confidence update is a single clamped
/// read-modify-write statement, stored at 1e-6 resolution so repeated
/// deltas do not accumulate float drift.
pub fn apply_feedback(
    conn: &Connection,
    feedback: &Feedback,
    mutation: &DialogMutation,
) -> KbResult<Dialog> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("apply_feedback begin: {e}")))?;

    let updated = apply_feedback_inner(&tx, feedback, mutation)?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("apply_feedback commit: {e}")))?;
    Ok(updated)
}

fn apply_feedback_inner(
    conn: &Connection,
    feedback: &Feedback,
    mutation: &DialogMutation,
) -> KbResult<Dialog> {
    let now = fmt_ts(Utc::now());
    let rows = conn
        .execute(
            "UPDATE dialogs SET
                confidence_score = ROUND(MIN(1.0, MAX(0.0, confidence_score + ?2)), 6),
                was_helpful = COALESCE(?3, was_helpful),
                used_count = used_count + ?4,
                last_used_at = CASE WHEN ?4 > 0 THEN ?5 ELSE last_used_at END,
                requires_human_review = MAX(requires_human_review, ?6),
                updated_at = ?5
             WHERE id = ?1",
            params![
                feedback.dialog_id,
                mutation.confidence_delta,
                mutation.set_was_helpful,
                i64::from(mutation.increment_used),
                now,
                mutation.require_review,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(KbError::DialogNotFound {
            id: feedback.dialog_id.clone(),
        });
    }

    conn.execute(
        "INSERT INTO dialog_feedback (id, dialog_id, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            feedback.id,
            feedback.dialog_id,
            feedback.rating.as_str(),
            feedback.comment,
            fmt_ts(feedback.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    get_dialog(conn, &feedback.dialog_id)?.ok_or_else(|| KbError::DialogNotFound {
        id: feedback.dialog_id.clone(),
    })
}

/// `count += 1` for `(date, rating)`, creating the row on first use.
pub fn increment_daily_feedback(conn: &Connection, date: NaiveDate, rating: Rating) -> KbResult<()> {
    conn.execute(
        "INSERT INTO feedback_daily_stats (stat_date, rating, count) VALUES (?1, ?2, 1)
         ON CONFLICT(stat_date, rating) DO UPDATE SET count = count + 1",
        params![date.to_string(), rating.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Tallies for one day; ratings with no events are omitted.
pub fn daily_feedback_stats(conn: &Connection, date: NaiveDate) -> KbResult<Vec<DailyFeedbackStat>> {
    let mut stmt = conn
        .prepare(
            "SELECT rating, count FROM feedback_daily_stats
             WHERE stat_date = ?1 ORDER BY rating",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![date.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (rating, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let rating = Rating::parse(&rating).ok_or_else(|| {
            corrupt("feedback_daily_stats", format!("unknown rating '{rating}'"))
        })?;
        out.push(DailyFeedbackStat {
            date,
            rating,
            count: count.max(0) as u64,
        });
    }
    Ok(out)
}

/// Feedback history of a dialog, oldest first.
pub fn feedback_for_dialog(conn: &Connection, dialog_id: &str) -> KbResult<Vec<Feedback>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, dialog_id, rating, comment, created_at FROM dialog_feedback
             WHERE dialog_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![dialog_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, dialog_id, rating, comment, created_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let rating = Rating::parse(&rating)
            .ok_or_else(|| corrupt("dialog_feedback", format!("unknown rating '{rating}'")))?;
        out.push(Feedback {
            id,
            dialog_id,
            rating,
            comment,
            created_at: parse_ts("dialog_feedback", &created_at)?,
        });
    }
    Ok(out)
}
