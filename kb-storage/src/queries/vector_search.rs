//! Cosine similarity scan over stored question embeddings.

use rusqlite::{params, Connection};

use kb_core::errors::KbResult;
use kb_core::models::Dialog;
use kb_core::traits::VectorQuery;

use super::codec::fmt_ts;
use super::dialog_crud::{row_to_dialog, DIALOG_COLUMNS};
use crate::to_storage_err;

/// Nearest searchable dialogs to the query vector.
///
/// Eligibility (active, canonical, embedded with matching dimensions, category,
/// helpfulness, expiry) is filtered in SQL; cosine similarity is computed here.
/// Returns at most `fetch_limit` `(dialog, similarity)` pairs ordered by
/// ascending cosine distance. No similarity threshold is applied.
pub fn search_vector(conn: &Connection, query: &VectorQuery<'_>) -> KbResult<Vec<(Dialog, f64)>> {
    let query_norm_sq: f64 = query.embedding.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 || query.fetch_limit == 0 {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT {DIALOG_COLUMNS} FROM dialogs
         WHERE is_active = 1
           AND is_duplicate_of IS NULL
           AND question_embedding IS NOT NULL
           AND embedding_dims = ?1
           AND (?2 IS NULL OR question_category = ?2)
           AND (?3 = 0 OR was_helpful IS NULL OR was_helpful = 1)
           AND (?4 = 0 OR expires_at IS NULL OR expires_at > ?5)"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![
                query.embedding.len() as i64,
                query.category,
                query.helpful_only,
                query.exclude_expired,
                fmt_ts(query.now),
            ],
            |row| Ok(row_to_dialog(row)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<(Dialog, f64)> = Vec::new();
    for row in rows {
        let dialog = row.map_err(|e| to_storage_err(e.to_string()))??;
        let Some(stored) = dialog.question_embedding.as_deref() else {
            continue;
        };
        let sim = cosine_similarity(query.embedding, stored);
        scored.push((dialog, sim));
    }

    // Ascending distance == descending similarity. Ties break on id for a
    // stable order across calls.
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
    scored.truncate(query.fetch_limit);

    Ok(scored)
}

/// Cosine similarity between two vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
