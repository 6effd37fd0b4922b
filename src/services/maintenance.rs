//! Periodic sweep demoting acquired chunks whose review date has passed.

use chrono::{DateTime, Utc};

use crate::database::ChunkStore;
use crate::error::StoreError;
use crate::models::{ChunkRecord, ChunkStatus};

/// Marks every overdue acquired chunk of the learner as fragile and returns
/// how many were demoted. Ease and interval are left alone. Chunks that are
/// no longer acquired, or were reviewed since the listing, are skipped, so
/// running it twice demotes nothing the second time.
pub fn decay_overdue_chunks<S: ChunkStore>(
    store: &S,
    learner_id: &str,
    now: DateTime<Utc>,
) -> usize {
    let overdue = match store.list_overdue_chunks(learner_id, now) {
        Ok(chunks) => chunks,
        Err(err) => {
            tracing::warn!(error = %err, learner_id, "could not list overdue chunks");
            return 0;
        }
    };

    let mut demoted = 0;
    for chunk in overdue {
        if !chunk.is_overdue(now) {
            continue;
        }
        match demote(store, &chunk) {
            Ok(()) => demoted += 1,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    learner_id,
                    chunk_id = %chunk.chunk_id,
                    "failed to demote overdue chunk"
                );
            }
        }
    }

    tracing::info!(learner_id, demoted, "maintenance sweep finished");
    demoted
}

fn demote<S: ChunkStore>(store: &S, chunk: &ChunkRecord) -> Result<(), StoreError> {
    let fragile = ChunkRecord {
        status: ChunkStatus::Fragile,
        ..chunk.clone()
    };
    // A conflict means an encounter landed after the listing; that encounter wins.
    store.put_chunk(&chunk.learner_id, &chunk.chunk_id, &fragile)
}
