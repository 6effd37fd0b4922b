//! Turns a completed lesson session into one scheduling update per chunk.
//!
//! The session only reports a single star rating, so every chunk touched in it
//! is scheduled with the same outcome. That is a coarse proxy for per-chunk
//! performance and stays that way until activity results carry their chunk id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::ChunkStore;
use crate::error::StoreError;
use crate::models::{ChunkRecord, Encounter, Outcome, StarRating, calculate_next_review};

/// Read-modify-write attempts per chunk before a version conflict is reported.
const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub learner_id: String,
    pub topic_id: String,
    /// Chunks in the order they were touched. Repeats are separate encounters.
    pub chunk_ids: Vec<String>,
    pub rating: StarRating,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    pub chunk_id: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcome: Outcome,
    pub recorded: Vec<ChunkRecord>,
    pub failures: Vec<ChunkFailure>,
}

/// Expands the session into per-chunk encounters, all carrying the session outcome.
pub fn session_encounters(chunk_ids: &[String], rating: StarRating) -> Vec<Encounter> {
    let outcome = Outcome::from(rating);
    chunk_ids
        .iter()
        .map(|chunk_id| Encounter {
            chunk_id: chunk_id.clone(),
            outcome,
        })
        .collect()
}

/// Schedules and persists every chunk of the session. A chunk that fails to
/// load or save is logged and skipped; the rest of the batch still runs.
pub fn record_batch_encounters<S: ChunkStore>(
    store: &S,
    session: &SessionResult,
    current_date: DateTime<Utc>,
) -> BatchReport {
    let outcome = Outcome::from(session.rating);
    let mut report = BatchReport {
        outcome,
        recorded: Vec::with_capacity(session.chunk_ids.len()),
        failures: Vec::new(),
    };

    if session.chunk_ids.is_empty() {
        tracing::debug!(learner_id = %session.learner_id, "session touched no chunks");
        return report;
    }

    for encounter in session_encounters(&session.chunk_ids, session.rating) {
        match record_encounter(store, session, &encounter, current_date) {
            Ok(record) => report.recorded.push(record),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    learner_id = %session.learner_id,
                    chunk_id = %encounter.chunk_id,
                    "failed to record chunk encounter"
                );
                report.failures.push(ChunkFailure {
                    chunk_id: encounter.chunk_id,
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        learner_id = %session.learner_id,
        topic_id = %session.topic_id,
        ?outcome,
        recorded = report.recorded.len(),
        failed = report.failures.len(),
        "session encounters recorded"
    );
    report
}

/// One chunk's read-modify-write. A missing record is a chunk met for the
/// first time. Version conflicts re-read and retry.
fn record_encounter<S: ChunkStore>(
    store: &S,
    session: &SessionResult,
    encounter: &Encounter,
    current_date: DateTime<Utc>,
) -> Result<ChunkRecord, StoreError> {
    let learner_id = session.learner_id.as_str();
    let chunk_id = encounter.chunk_id.as_str();
    let mut attempt = 1;

    loop {
        let current = store
            .get_chunk(learner_id, chunk_id)?
            .unwrap_or_else(|| ChunkRecord::new(learner_id, chunk_id, &session.topic_id));
        let next = calculate_next_review(&current, encounter.outcome, current_date);

        match store.put_chunk(learner_id, chunk_id, &next) {
            Ok(()) => {
                return Ok(ChunkRecord {
                    version: next.version + 1,
                    ..next
                });
            }
            Err(StoreError::Conflict { .. }) if attempt < MAX_WRITE_ATTEMPTS => {
                tracing::debug!(
                    learner_id,
                    chunk_id,
                    attempt,
                    "chunk changed underneath, retrying"
                );
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
