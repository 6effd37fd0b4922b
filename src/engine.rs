//! Entry points the surrounding application calls. The chunk store is
//! injected at construction; nothing here reaches for a global instance.

use chrono::{DateTime, Utc};

use crate::database::ChunkStore;
use crate::error::StoreError;
use crate::models::{
    GrowthStage, Topic, TopicView, calculate_topic_health, growth_stage, health_from_elapsed_days,
};
use crate::services::{BatchReport, SessionResult, decay_overdue_chunks, record_batch_encounters};

pub struct ProgressEngine<S> {
    store: S,
}

impl<S: ChunkStore> ProgressEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records a finished lesson. Never fails; per-chunk problems are in the report.
    pub fn submit_session_result(
        &self,
        session: &SessionResult,
        now: DateTime<Utc>,
    ) -> BatchReport {
        record_batch_encounters(&self.store, session, now)
    }

    /// Status-based health of a topic, recomputed from its chunks on every call.
    pub fn topic_health(&self, learner_id: &str, topic_id: &str) -> Result<u8, StoreError> {
        let chunks = self.store.list_chunks_by_topic(learner_id, topic_id)?;
        Ok(calculate_topic_health(chunks.iter().map(|chunk| chunk.status)))
    }

    pub fn lesson_freshness(&self, days_since_completion: i64) -> u8 {
        health_from_elapsed_days(days_since_completion)
    }

    pub fn growth_stage(&self, cumulative_currency: u64) -> GrowthStage {
        growth_stage(cumulative_currency)
    }

    /// Stage and freshness of a topic's tree as of `now`.
    pub fn topic_view(&self, topic: &Topic, now: DateTime<Utc>) -> TopicView {
        TopicView::of(topic, now)
    }

    /// Meant to run once per application start.
    pub fn run_maintenance_sweep(&self, learner_id: &str, now: DateTime<Utc>) -> usize {
        decay_overdue_chunks(&self.store, learner_id, now)
    }
}
