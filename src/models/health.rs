//! The two health views shown on a topic: one averaged from chunk statuses,
//! one decayed from time since the last activity. They are never combined.

use chrono::{DateTime, Utc};

use super::chunk::ChunkStatus;

/// Health reported for a topic that has no chunk data yet.
pub const NEUTRAL_HEALTH: u8 = 50;

/// (maximum elapsed days, health) steps, checked in order.
const DECAY_STEPS: [(i64, u8); 5] = [(2, 100), (5, 85), (10, 60), (14, 35), (21, 15)];
const STALE_HEALTH: u8 = 5;

impl ChunkStatus {
    pub fn health_points(self) -> u8 {
        match self {
            ChunkStatus::New => 40,
            ChunkStatus::Learning => 60,
            ChunkStatus::Acquired => 100,
            ChunkStatus::Fragile => 30,
        }
    }
}

/// Mean of per-chunk status points, rounded to the nearest integer.
pub fn calculate_topic_health<I>(statuses: I) -> u8
where
    I: IntoIterator<Item = ChunkStatus>,
{
    let (total, count) = statuses
        .into_iter()
        .fold((0u64, 0u64), |(total, count), status| {
            (total + u64::from(status.health_points()), count + 1)
        });

    if count == 0 {
        return NEUTRAL_HEALTH;
    }
    (total as f64 / count as f64).round() as u8
}

/// Freshness of something last touched `days_since_activity` days ago.
/// Negative values (clock skew) count as today.
pub fn health_from_elapsed_days(days_since_activity: i64) -> u8 {
    let days = days_since_activity.max(0);
    DECAY_STEPS
        .iter()
        .find(|(max_days, _)| days <= *max_days)
        .map_or(STALE_HEALTH, |&(_, health)| health)
}

/// Whole days from `since` to `now`; negative if `since` lies in the future.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_days()
}
