//! Recording answered questions into the corpus.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use kb_core::errors::{KbError, KbResult};
use kb_core::models::{Dialog, NewDialog, ResolvedCase};
use kb_core::text;
use kb_core::traits::{IDialogStore, IEmbeddingProvider};

#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub dialog: Dialog,
    /// Canonical id when the question was already known.
    pub duplicate_of: Option<String>,
    /// False when the provider failed; the dialog is stored without a vector
    /// and stays out of search until backfilled.
    pub embedded: bool,
}

pub struct DialogRecorder<'a> {
    store: &'a dyn IDialogStore,
    embedder: &'a dyn IEmbeddingProvider,
}

impl<'a> DialogRecorder<'a> {
    pub fn new(store: &'a dyn IDialogStore, embedder: &'a dyn IEmbeddingProvider) -> Self {
        Self { store, embedder }
    }

    /// Store a new dialog.
    ///
    /// A question whose normalized hash matches an active, unexpired canonical
    /// dialog is stored as a duplicate of it without calling the provider. The
    /// canonical lookup is repeated inside the store's insert, so a concurrent
    /// recorder that won the race still turns this row into a duplicate.
    pub fn record(&self, new: &NewDialog) -> KbResult<RecordOutcome> {
        text::validate_question(&new.question_text)?;
        if new.answer_text.trim().is_empty() {
            return Err(KbError::validation("answer text is empty"));
        }

        let hash = text::question_hash(&new.question_text);
        let known = self.store.find_canonical_by_hash(&hash, Utc::now())?;
        let embedding = match known {
            Some(_) => None,
            None => self.embed(new),
        };

        let mut dialog = Dialog::from_new(new, embedding);
        let duplicate_of = self.store.insert_or_link_dialog(&dialog, Utc::now())?;
        if let Some(canonical) = &duplicate_of {
            dialog.is_duplicate_of = Some(canonical.clone());
            dialog.question_embedding = None;
            debug!(dialog_id = %dialog.id, canonical = %canonical, "duplicate question recorded");
        }
        let embedded = dialog.question_embedding.is_some();
        if duplicate_of.is_none() {
            info!(dialog_id = %dialog.id, embedded, "dialog recorded");
        }

        Ok(RecordOutcome {
            dialog,
            duplicate_of,
            embedded,
        })
    }

    fn embed(&self, new: &NewDialog) -> Option<Vec<f32>> {
        match self.embedder.embed(&new.question_text) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(
                    provider = self.embedder.name(),
                    error = %e,
                    "storing dialog without embedding"
                );
                None
            }
        }
    }

    /// Synthesize an automatic dialog from a resolved support case.
    pub fn record_from_case(&self, case: &ResolvedCase) -> KbResult<RecordOutcome> {
        self.record(&NewDialog::from(case))
    }

    /// Retire a dialog. It stays in the table for history.
    pub fn deactivate(&self, dialog_id: &str) -> KbResult<()> {
        self.store.deactivate_dialog(dialog_id)?;
        info!(dialog_id, "dialog deactivated");
        Ok(())
    }

    /// Set or clear the expiry timestamp.
    pub fn expire(&self, dialog_id: &str, at: Option<DateTime<Utc>>) -> KbResult<()> {
        self.store.set_expiry(dialog_id, at)
    }
}
