//! StorageEngine: owns the ConnectionPool, runs migrations on open, and
//! implements the dialog and solution store traits.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use kb_core::config::StorageConfig;
use kb_core::errors::KbResult;
use kb_core::models::{
    DailyFeedbackStat, Dialog, DialogMutation, Feedback, Rating, Solution, UsageVote,
};
use kb_core::traits::{IDialogStore, ISolutionStore, VectorQuery};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{dialog_crud, feedback_ops, solution_ops, vector_search};

const DEFAULT_READ_POOL_SIZE: usize = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed engines read through the pool; in-memory engines route
    /// reads through the writer because a second in-memory connection is a
    /// different database.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> KbResult<Self> {
        Self::open_file(path, DEFAULT_READ_POOL_SIZE, DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn open_with_config(config: &StorageConfig) -> KbResult<Self> {
        Self::open_file(
            Path::new(&config.db_path),
            config.read_pool_size,
            config.busy_timeout_ms,
        )
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> KbResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn open_file(path: &Path, read_pool_size: usize, busy_timeout_ms: u64) -> KbResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        info!(path = %path.display(), readers = read_pool_size, "storage opened");
        Ok(engine)
    }

    fn initialize(&self) -> KbResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            let version = migrations::run_migrations(conn)?;
            debug!(schema_version = version, "migrations applied");
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// File-backed: read pool. In-memory: writer.
    fn with_reader<F, T>(&self, f: F) -> KbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> KbResult<T>,
    {
        match (&self.pool.readers, self.use_read_pool) {
            (Some(readers), true) => readers.with_conn(f),
            _ => self.pool.writer.with_conn_sync(f),
        }
    }
}

impl IDialogStore for StorageEngine {
    fn insert_dialog(&self, dialog: &Dialog) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::insert_dialog(conn, dialog))
    }

    fn get_dialog(&self, id: &str) -> KbResult<Option<Dialog>> {
        self.with_reader(|conn| dialog_crud::get_dialog(conn, id))
    }

    fn find_canonical_by_hash(
        &self,
        question_hash: &str,
        now: DateTime<Utc>,
    ) -> KbResult<Option<Dialog>> {
        // Read on the writer: dedup must see rows committed a moment ago.
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::find_canonical_by_hash(conn, question_hash, now))
    }

    fn insert_or_link_dialog(&self, dialog: &Dialog, now: DateTime<Utc>) -> KbResult<Option<String>> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::insert_or_link_dialog(conn, dialog, now))
    }

    fn set_embedding(&self, id: &str, embedding: &[f32]) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::set_embedding(conn, id, embedding))
    }

    fn deactivate_dialog(&self, id: &str) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::deactivate_dialog(conn, id))
    }

    fn set_expiry(&self, id: &str, expires_at: Option<DateTime<Utc>>) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::set_expiry(conn, id, expires_at))
    }

    fn search_vector(&self, query: &VectorQuery<'_>) -> KbResult<Vec<(Dialog, f64)>> {
        self.with_reader(|conn| vector_search::search_vector(conn, query))
    }

    fn apply_feedback(&self, feedback: &Feedback, mutation: &DialogMutation) -> KbResult<Dialog> {
        self.pool
            .writer
            .with_conn_sync(|conn| feedback_ops::apply_feedback(conn, feedback, mutation))
    }

    fn mark_used(&self, id: &str) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| dialog_crud::mark_used(conn, id))
    }

    fn increment_daily_feedback(&self, date: NaiveDate, rating: Rating) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| feedback_ops::increment_daily_feedback(conn, date, rating))
    }

    fn daily_feedback_stats(&self, date: NaiveDate) -> KbResult<Vec<DailyFeedbackStat>> {
        self.with_reader(|conn| feedback_ops::daily_feedback_stats(conn, date))
    }

    fn feedback_for_dialog(&self, dialog_id: &str) -> KbResult<Vec<Feedback>> {
        self.with_reader(|conn| feedback_ops::feedback_for_dialog(conn, dialog_id))
    }

    fn dialogs_missing_embedding(&self, limit: usize) -> KbResult<Vec<Dialog>> {
        self.with_reader(|conn| dialog_crud::dialogs_missing_embedding(conn, limit))
    }

    fn dialogs_requiring_review(&self, limit: usize) -> KbResult<Vec<Dialog>> {
        self.with_reader(|conn| dialog_crud::dialogs_requiring_review(conn, limit))
    }
}

impl ISolutionStore for StorageEngine {
    fn upsert_solution(&self, solution: &Solution) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| solution_ops::upsert_solution(conn, solution))
    }

    fn get_solution(&self, id: &str) -> KbResult<Option<Solution>> {
        self.with_reader(|conn| solution_ops::get_solution(conn, id))
    }

    fn active_solutions(&self, category: Option<&str>) -> KbResult<Vec<Solution>> {
        self.with_reader(|conn| solution_ops::active_solutions(conn, category))
    }

    fn record_solution_usage(&self, id: &str, vote: UsageVote) -> KbResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| solution_ops::record_solution_usage(conn, id, vote))
    }
}
