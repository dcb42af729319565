use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::KbResult;
use crate::models::{DailyFeedbackStat, Dialog, DialogMutation, Feedback, Rating, Solution, UsageVote};

/// Store-level filter for a vector similarity scan.
#[derive(Debug, Clone)]
pub struct VectorQuery<'a> {
    pub embedding: &'a [f32],
    /// Nearest-first rows to return, before any similarity threshold.
    pub fetch_limit: usize,
    pub category: Option<&'a str>,
    /// Exclude dialogs explicitly marked not helpful.
    pub helpful_only: bool,
    pub exclude_expired: bool,
    pub now: DateTime<Utc>,
}

/// Persistence for the dialog corpus and its feedback.
pub trait IDialogStore: Send + Sync {
    // --- CRUD ---
    fn insert_dialog(&self, dialog: &Dialog) -> KbResult<()>;
    fn get_dialog(&self, id: &str) -> KbResult<Option<Dialog>>;
    /// Active, unexpired, canonical dialog carrying this question hash.
    fn find_canonical_by_hash(&self, question_hash: &str, now: DateTime<Utc>) -> KbResult<Option<Dialog>>;
    /// Insert `dialog`, or link it to the canonical dialog for its hash when
    /// one exists at `now`. Lookup and insert share one write lock.
    /// Returns the canonical id when the row was stored as a duplicate.
    fn insert_or_link_dialog(&self, dialog: &Dialog, now: DateTime<Utc>) -> KbResult<Option<String>>;
    fn set_embedding(&self, id: &str, embedding: &[f32]) -> KbResult<()>;
    fn deactivate_dialog(&self, id: &str) -> KbResult<()>;
    fn set_expiry(&self, id: &str, expires_at: Option<DateTime<Utc>>) -> KbResult<()>;

    // --- Search ---
    /// Active, canonical, embedded dialogs nearest to the query, ordered by
    /// ascending cosine distance, paired with `1 - distance`.
    fn search_vector(&self, query: &VectorQuery<'_>) -> KbResult<Vec<(Dialog, f64)>>;

    // --- Mutation ---
    /// Persist the feedback row and apply the mutation atomically.
    /// Returns the dialog as it reads after the mutation.
    fn apply_feedback(&self, feedback: &Feedback, mutation: &DialogMutation) -> KbResult<Dialog>;
    /// Atomic `used_count += 1`, `last_used_at = now`.
    fn mark_used(&self, id: &str) -> KbResult<()>;

    // --- Aggregation ---
    fn increment_daily_feedback(&self, date: NaiveDate, rating: Rating) -> KbResult<()>;
    fn daily_feedback_stats(&self, date: NaiveDate) -> KbResult<Vec<DailyFeedbackStat>>;
    fn feedback_for_dialog(&self, dialog_id: &str) -> KbResult<Vec<Feedback>>;

    // --- Maintenance ---
    fn dialogs_missing_embedding(&self, limit: usize) -> KbResult<Vec<Dialog>>;
    fn dialogs_requiring_review(&self, limit: usize) -> KbResult<Vec<Dialog>>;
}

/// Persistence for the keyword-indexed solutions catalog.
pub trait ISolutionStore: Send + Sync {
    fn upsert_solution(&self, solution: &Solution) -> KbResult<()>;
    fn get_solution(&self, id: &str) -> KbResult<Option<Solution>>;
    /// Active solutions, optionally restricted to one category.
    fn active_solutions(&self, category: Option<&str>) -> KbResult<Vec<Solution>>;
    /// Atomic counter increment for the given vote.
    fn record_solution_usage(&self, id: &str, vote: UsageVote) -> KbResult<()>;
}
