//! A learner's topic and the tree that grows with it.
//!
//! Currency only ever goes up. Stage and freshness are derived on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::growth::{GrowthStage, growth_stage};
use super::health::{elapsed_days, health_from_elapsed_days};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub learner_id: String,
    pub topic_id: String,
    pub cumulative_currency: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl Topic {
    pub fn new(learner_id: &str, topic_id: &str) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            topic_id: topic_id.to_string(),
            cumulative_currency: 0,
            last_activity: None,
        }
    }

    /// Credits a completed session.
    pub fn record_session(&mut self, earned: u64, now: DateTime<Utc>) {
        self.cumulative_currency = self.cumulative_currency.saturating_add(earned);
        self.last_activity = Some(self.last_activity.map_or(now, |last| last.max(now)));
    }

    pub fn growth_stage(&self) -> GrowthStage {
        growth_stage(self.cumulative_currency)
    }

    pub fn days_since_activity(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_activity.map(|last| elapsed_days(last, now))
    }

    /// Time-decayed health. A topic never practised reads as stale.
    pub fn freshness(&self, now: DateTime<Utc>) -> u8 {
        self.days_since_activity(now)
            .map_or_else(|| health_from_elapsed_days(i64::MAX), health_from_elapsed_days)
    }
}

/// Read-only summary of a topic's tree at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicView {
    pub topic_id: String,
    pub cumulative_currency: u64,
    pub stage: GrowthStage,
    pub stage_index: usize,
    pub progress_to_next: f64,
    pub days_since_activity: Option<i64>,
    pub freshness: u8,
}

impl TopicView {
    pub fn of(topic: &Topic, now: DateTime<Utc>) -> Self {
        let stage = topic.growth_stage();
        Self {
            topic_id: topic.topic_id.clone(),
            cumulative_currency: topic.cumulative_currency,
            stage,
            stage_index: stage.index(),
            progress_to_next: stage.progress_to_next(topic.cumulative_currency),
            days_since_activity: topic.days_since_activity(now),
            freshness: topic.freshness(now),
        }
    }
}
