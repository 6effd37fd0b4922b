//! SM-2 derived scheduler driven by a three-tier encounter outcome.
//!
//! - `Incorrect`: ease -0.3, interval back to 1 day, repetitions reset.
//!   An acquired chunk becomes fragile.
//! - `CorrectAided`: ease -0.1, interval x1.2, repetitions untouched.
//!   No graduation on an aided answer.
//! - `CorrectUnaided`: repetitions +1; interval 1 -> 3 -> interval x ease;
//!   ease +0.1 once the chunk has two or more repetitions behind it.
//!   Learning and fragile chunks (re)graduate to acquired at 3+ repetitions
//!   with ease >= 2.0.
//!
//! A chunk's first encounter always moves it from new to learning, whatever the outcome.
//! Ease stays in [1.3, 3.0]; intervals are rounded then clamped to [1, 180] days.

use chrono::{DateTime, Utc};

use super::chunk::{ChunkRecord, ChunkStatus, MIN_INTERVAL_DAYS, clamp_ease, clamp_interval};
use super::encounter::Outcome;

const INCORRECT_EASE_PENALTY: f64 = 0.3;
const AIDED_EASE_PENALTY: f64 = 0.1;
const UNAIDED_EASE_BONUS: f64 = 0.1;
const AIDED_INTERVAL_MULTIPLIER: f64 = 1.2;
const SECOND_INTERVAL_DAYS: u32 = 3;
pub const GRADUATION_REPETITIONS: u32 = 3;
pub const GRADUATION_EASE: f64 = 2.0;

/// Calculates the chunk's next scheduling state after one encounter.
/// Out-of-range stored values are clamped before use.
pub fn calculate_next_review(
    chunk: &ChunkRecord,
    outcome: Outcome,
    current_date: DateTime<Utc>,
) -> ChunkRecord {
    let ease = clamp_ease(chunk.ease_factor);
    let interval = clamp_interval(f64::from(chunk.interval_days));

    let (ease_factor, interval_days, repetitions) = match outcome {
        Outcome::Incorrect => (
            clamp_ease(ease - INCORRECT_EASE_PENALTY),
            MIN_INTERVAL_DAYS,
            0,
        ),
        Outcome::CorrectAided => (
            clamp_ease(ease - AIDED_EASE_PENALTY),
            clamp_interval(f64::from(interval) * AIDED_INTERVAL_MULTIPLIER),
            chunk.repetitions,
        ),
        Outcome::CorrectUnaided => {
            let next_interval = match chunk.repetitions {
                0 => MIN_INTERVAL_DAYS,
                1 => SECOND_INTERVAL_DAYS,
                _ => clamp_interval(f64::from(interval) * ease),
            };
            let next_ease = if chunk.repetitions >= 2 {
                clamp_ease(ease + UNAIDED_EASE_BONUS)
            } else {
                ease
            };
            (next_ease, next_interval, chunk.repetitions.saturating_add(1))
        }
    };

    let graduates = repetitions >= GRADUATION_REPETITIONS && ease_factor >= GRADUATION_EASE;
    let status = match (chunk.status, outcome) {
        (ChunkStatus::New, _) => ChunkStatus::Learning,
        (ChunkStatus::Acquired, Outcome::Incorrect) => ChunkStatus::Fragile,
        (ChunkStatus::Learning | ChunkStatus::Fragile, Outcome::CorrectUnaided) if graduates => {
            ChunkStatus::Acquired
        }
        (status, _) => status,
    };

    ChunkRecord {
        status,
        ease_factor,
        interval_days,
        repetitions,
        last_reviewed: Some(current_date),
        ..chunk.clone()
    }
}
