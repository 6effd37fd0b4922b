//! The chunk record store boundary.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::ChunkRecord;

/// Durable per-learner chunk state. Implementations must make each
/// `put_chunk` atomic for a single chunk: the write succeeds only when the
/// stored version still equals `record.version` (no stored row counts as
/// version 0), and it stores the record with `version + 1`. Anything else is
/// a `StoreError::Conflict`.
pub trait ChunkStore {
    fn get_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
    ) -> Result<Option<ChunkRecord>, StoreError>;

    fn put_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
        record: &ChunkRecord,
    ) -> Result<(), StoreError>;

    fn list_chunks_by_topic(
        &self,
        learner_id: &str,
        topic_id: &str,
    ) -> Result<Vec<ChunkRecord>, StoreError>;

    /// Acquired chunks whose next due date is before `now`.
    fn list_overdue_chunks(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChunkRecord>, StoreError>;

    fn list_chunks(&self, learner_id: &str) -> Result<Vec<ChunkRecord>, StoreError>;
}
