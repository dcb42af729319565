//! Re-embedding of dialogs stored without a vector.
//!
//! Dialogs written while the provider was down keep a NULL embedding and are
//! invisible to search until this pass fills them in. Batches are processed
//! oldest first; the pass stops when the provider is unreachable or a batch
//! makes no progress.

use kb_core::errors::{EmbeddingError, KbResult};
use kb_core::traits::{IDialogStore, IEmbeddingProvider};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub scanned: usize,
    pub embedded: usize,
    pub failed: usize,
}

pub fn backfill_missing(
    store: &dyn IDialogStore,
    provider: &dyn IEmbeddingProvider,
    batch_size: usize,
) -> KbResult<BackfillReport> {
    let batch_size = batch_size.max(1);
    let mut report = BackfillReport::default();

    loop {
        let batch = store.dialogs_missing_embedding(batch_size)?;
        if batch.is_empty() {
            break;
        }

        let mut progressed = 0usize;
        let mut provider_down = false;
        for dialog in &batch {
            report.scanned += 1;
            match provider.embed(&dialog.question_text) {
                Ok(embedding) => {
                    store.set_embedding(&dialog.id, &embedding)?;
                    report.embedded += 1;
                    progressed += 1;
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(dialog_id = %dialog.id, error = %e, "backfill embedding failed");
                    if matches!(
                        e,
                        EmbeddingError::ProviderUnavailable { .. } | EmbeddingError::Timeout { .. }
                    ) {
                        provider_down = true;
                        break;
                    }
                }
            }
        }

        if provider_down || progressed == 0 || batch.len() < batch_size {
            break;
        }
    }

    info!(
        scanned = report.scanned,
        embedded = report.embedded,
        failed = report.failed,
        "embedding backfill finished"
    );
    Ok(report)
}
