//! In-process chunk store backed by a `HashMap`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::store::ChunkStore;
use crate::error::StoreError;
use crate::models::ChunkRecord;

type ChunkKey = (String, String);

#[derive(Default)]
pub struct MemoryChunkStore {
    chunks: Mutex<HashMap<ChunkKey, ChunkRecord>>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ChunkKey, ChunkRecord>>, StoreError> {
        self.chunks
            .lock()
            .map_err(|_| StoreError::Unavailable("chunk map lock poisoned".to_string()))
    }

    fn collect<F>(&self, learner_id: &str, keep: F) -> Result<Vec<ChunkRecord>, StoreError>
    where
        F: Fn(&ChunkRecord) -> bool,
    {
        let mut records: Vec<ChunkRecord> = self
            .lock()?
            .values()
            .filter(|record| record.learner_id == learner_id && keep(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.chunk_id.cmp(&b.chunk_id));
        Ok(records)
    }
}

impl ChunkStore for MemoryChunkStore {
    fn get_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
    ) -> Result<Option<ChunkRecord>, StoreError> {
        let key = (learner_id.to_string(), chunk_id.to_string());
        Ok(self.lock()?.get(&key).cloned())
    }

    fn put_chunk(
        &self,
        learner_id: &str,
        chunk_id: &str,
        record: &ChunkRecord,
    ) -> Result<(), StoreError> {
        let key = (learner_id.to_string(), chunk_id.to_string());
        let mut chunks = self.lock()?;
        let stored_version = chunks.get(&key).map_or(0, |existing| existing.version);
        if stored_version != record.version {
            return Err(StoreError::Conflict {
                chunk_id: chunk_id.to_string(),
            });
        }

        let mut stored = record.clone();
        stored.learner_id = learner_id.to_string();
        stored.chunk_id = chunk_id.to_string();
        stored.version = record.version + 1;
        chunks.insert(key, stored);
        Ok(())
    }

    fn list_chunks_by_topic(
        &self,
        learner_id: &str,
        topic_id: &str,
    ) -> Result<Vec<ChunkRecord>, StoreError> {
        self.collect(learner_id, |record| record.topic_id == topic_id)
    }

    fn list_overdue_chunks(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChunkRecord>, StoreError> {
        self.collect(learner_id, |record| record.is_overdue(now))
    }

    fn list_chunks(&self, learner_id: &str) -> Result<Vec<ChunkRecord>, StoreError> {
        self.collect(learner_id, |_| true)
    }
}
