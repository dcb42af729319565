//! Solutions catalog: upsert, lookup, vote counters.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use kb_core::errors::{KbError, KbResult};
use kb_core::models::{Solution, UsageVote};

use super::codec::{corrupt, fmt_ts, parse_opt_ts, parse_ts};
use crate::to_storage_err;

const SOLUTION_COLUMNS: &str = "id, category, subcategory, problem_keywords, problem_pattern,
    solution_text, solution_steps, success_score, used_count, helpful_votes, not_helpful_votes,
    is_verified, is_active, avg_resolution_minutes, created_at, updated_at, last_used_at";

/// Insert or replace the editable fields of a solution. Counters of an
/// existing row are left untouched so curation does not reset usage history.
pub fn upsert_solution(conn: &Connection, solution: &Solution) -> KbResult<()> {
    let keywords = serde_json::to_string(&solution.problem_keywords)?;
    let steps = serde_json::to_string(&solution.solution_steps)?;

    conn.execute(
        "INSERT INTO solutions (
            id, category, subcategory, problem_keywords, problem_pattern, solution_text,
            solution_steps, success_score, used_count, helpful_votes, not_helpful_votes,
            is_verified, is_active, avg_resolution_minutes, created_at, updated_at, last_used_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        ON CONFLICT(id) DO UPDATE SET
            category = excluded.category,
            subcategory = excluded.subcategory,
            problem_keywords = excluded.problem_keywords,
            problem_pattern = excluded.problem_pattern,
            solution_text = excluded.solution_text,
            solution_steps = excluded.solution_steps,
            success_score = excluded.success_score,
            is_verified = excluded.is_verified,
            is_active = excluded.is_active,
            avg_resolution_minutes = excluded.avg_resolution_minutes,
            updated_at = excluded.updated_at",
        params![
            solution.id,
            solution.category,
            solution.subcategory,
            keywords,
            solution.problem_pattern,
            solution.solution_text,
            steps,
            solution.success_score,
            solution.used_count as i64,
            solution.helpful_votes as i64,
            solution.not_helpful_votes as i64,
            solution.is_verified,
            solution.is_active,
            solution.avg_resolution_minutes,
            fmt_ts(solution.created_at),
            fmt_ts(solution.updated_at),
            solution.last_used_at.map(fmt_ts),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_solution(conn: &Connection, id: &str) -> KbResult<Option<Solution>> {
    let sql = format!("SELECT {SOLUTION_COLUMNS} FROM solutions WHERE id = ?1");
    conn.query_row(&sql, params![id], |row| Ok(row_to_solution(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

/// Active solutions, best-rated first.
pub fn active_solutions(conn: &Connection, category: Option<&str>) -> KbResult<Vec<Solution>> {
    let sql = format!(
        "SELECT {SOLUTION_COLUMNS} FROM solutions
         WHERE is_active = 1 AND (?1 IS NULL OR category = ?1)
         ORDER BY success_score DESC, used_count DESC, id ASC"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![category], |row| Ok(row_to_solution(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

pub fn record_solution_usage(conn: &Connection, id: &str, vote: UsageVote) -> KbResult<()> {
    let now = fmt_ts(Utc::now());
    let sql = match vote {
        UsageVote::Helpful => {
            "UPDATE solutions SET helpful_votes = helpful_votes + 1, updated_at = ?2 WHERE id = ?1"
        }
        UsageVote::NotHelpful => {
            "UPDATE solutions SET not_helpful_votes = not_helpful_votes + 1, updated_at = ?2
             WHERE id = ?1"
        }
        UsageVote::Used => {
            "UPDATE solutions SET used_count = used_count + 1, last_used_at = ?2, updated_at = ?2
             WHERE id = ?1"
        }
    };
    let rows = conn
        .execute(sql, params![id, now])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(KbError::SolutionNotFound { id: id.to_string() });
    }
    Ok(())
}

fn row_to_solution(row: &Row<'_>) -> KbResult<Solution> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());

    let keywords: String = row.get(3).map_err(get_err)?;
    let steps: String = row.get(6).map_err(get_err)?;
    let created_at: String = row.get(14).map_err(get_err)?;
    let updated_at: String = row.get(15).map_err(get_err)?;

    Ok(Solution {
        id: row.get(0).map_err(get_err)?,
        category: row.get(1).map_err(get_err)?,
        subcategory: row.get(2).map_err(get_err)?,
        problem_keywords: serde_json::from_str(&keywords)
            .map_err(|e| corrupt("solutions", format!("problem_keywords: {e}")))?,
        problem_pattern: row.get(4).map_err(get_err)?,
        solution_text: row.get(5).map_err(get_err)?,
        solution_steps: serde_json::from_str(&steps)
            .map_err(|e| corrupt("solutions", format!("solution_steps: {e}")))?,
        success_score: row.get(7).map_err(get_err)?,
        used_count: row.get::<_, i64>(8).map_err(get_err)?.max(0) as u64,
        helpful_votes: row.get::<_, i64>(9).map_err(get_err)?.max(0) as u64,
        not_helpful_votes: row.get::<_, i64>(10).map_err(get_err)?.max(0) as u64,
        is_verified: row.get(11).map_err(get_err)?,
        is_active: row.get(12).map_err(get_err)?,
        avg_resolution_minutes: row.get(13).map_err(get_err)?,
        created_at: parse_ts("solutions", &created_at)?,
        updated_at: parse_ts("solutions", &updated_at)?,
        last_used_at: parse_opt_ts("solutions", row.get(16).map_err(get_err)?)?,
    })
}
