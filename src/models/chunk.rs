//! Per-learner chunk record: mastery status plus SM-2 scheduling fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_EASE_FACTOR: f64 = 3.0;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_INTERVAL_DAYS: u32 = 1;
pub const MAX_INTERVAL_DAYS: u32 = 180;

/// Mastery status of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    New,
    Learning,
    Acquired,
    Fragile,
}

impl ChunkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChunkStatus::New => "new",
            ChunkStatus::Learning => "learning",
            ChunkStatus::Acquired => "acquired",
            ChunkStatus::Fragile => "fragile",
        }
    }

    /// Whether `self -> next` is an edge of the status graph. Staying put is
    /// always allowed.
    pub fn can_transition_to(self, next: ChunkStatus) -> bool {
        use ChunkStatus::*;
        self == next
            || matches!(
                (self, next),
                (New, Learning) | (Learning, Acquired) | (Acquired, Fragile) | (Fragile, Acquired)
            )
    }
}

impl fmt::Display for ChunkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ChunkStatus::New),
            "learning" => Ok(ChunkStatus::Learning),
            "acquired" => Ok(ChunkStatus::Acquired),
            "fragile" => Ok(ChunkStatus::Fragile),
            other => Err(StoreError::Corrupt(format!("unknown chunk status '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub learner_id: String,
    pub chunk_id: String,
    pub topic_id: String,
    pub status: ChunkStatus,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Optimistic-concurrency token; the store bumps it on every successful write.
    #[serde(default)]
    pub version: u64,
}

impl ChunkRecord {
    /// A chunk the learner has just met for the first time.
    pub fn new(learner_id: &str, chunk_id: &str, topic_id: &str) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            chunk_id: chunk_id.to_string(),
            topic_id: topic_id.to_string(),
            status: ChunkStatus::New,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: MIN_INTERVAL_DAYS,
            repetitions: 0,
            last_reviewed: None,
            version: 0,
        }
    }

    /// `last_reviewed + interval`. Never-reviewed chunks have no due date.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed.map(|at| at + Duration::days(i64::from(self.interval_days)))
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ChunkStatus::Acquired && self.next_due().is_some_and(|due| due < now)
    }
}

/// Clamps a possibly corrupted stored ease factor into range. NaN falls back
/// to the floor.
pub fn clamp_ease(ease: f64) -> f64 {
    if ease.is_nan() {
        return MIN_EASE_FACTOR;
    }
    ease.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
}

/// Rounds to whole days, then clamps into [1, 180].
pub fn clamp_interval(days: f64) -> u32 {
    let rounded = days.round();
    if rounded.is_nan() || rounded < f64::from(MIN_INTERVAL_DAYS) {
        MIN_INTERVAL_DAYS
    } else if rounded > f64::from(MAX_INTERVAL_DAYS) {
        MAX_INTERVAL_DAYS
    } else {
        rounded as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_chunk_defaults() {
        let chunk = ChunkRecord::new("kid-1", "hola", "greetings");
        assert_eq!(chunk.status, ChunkStatus::New);
        assert_eq!(chunk.ease_factor, 2.5);
        assert_eq!(chunk.interval_days, 1);
        assert_eq!(chunk.repetitions, 0);
        assert!(chunk.next_due().is_none());
    }

    #[test]
    fn test_next_due_adds_interval() {
        let mut chunk = ChunkRecord::new("kid-1", "hola", "greetings");
        let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        chunk.last_reviewed = Some(reviewed);
        chunk.interval_days = 6;
        assert_eq!(
            chunk.next_due(),
            Some(Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_only_acquired_chunks_are_overdue() {
        let mut chunk = ChunkRecord::new("kid-1", "hola", "greetings");
        let reviewed = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
        chunk.last_reviewed = Some(reviewed);
        chunk.status = ChunkStatus::Learning;
        assert!(!chunk.is_overdue(later));
        chunk.status = ChunkStatus::Acquired;
        assert!(chunk.is_overdue(later));
        assert!(!chunk.is_overdue(reviewed));
    }

    #[test]
    fn test_status_graph() {
        use super::ChunkStatus::*;
        assert!(New.can_transition_to(Learning));
        assert!(Acquired.can_transition_to(Fragile));
        assert!(Fragile.can_transition_to(Acquired));
        assert!(!New.can_transition_to(Acquired));
        assert!(!Fragile.can_transition_to(Learning));
        assert!(!Acquired.can_transition_to(Learning));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("fragile".parse::<ChunkStatus>().unwrap(), ChunkStatus::Fragile);
        assert!("mastered".parse::<ChunkStatus>().is_err());
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_ease(0.2), 1.3);
        assert_eq!(clamp_ease(9.0), 3.0);
        assert_eq!(clamp_ease(f64::NAN), 1.3);
        assert_eq!(clamp_interval(0.0), 1);
        assert_eq!(clamp_interval(-4.0), 1);
        assert_eq!(clamp_interval(2.5), 3);
        assert_eq!(clamp_interval(999.0), 180);
    }
}
