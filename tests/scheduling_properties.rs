//! Property-based tests for the scheduling and progress math.
//!
//! - Ease stays in [1.3, 3.0] and interval in [1, 180] after any encounter
//! - Status only moves along the new/learning/acquired/fragile graph
//! - Decay and growth are monotone and pure
//! - Topic health is order independent

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use learner_progress::models::chunk::{
    MAX_EASE_FACTOR, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, MIN_INTERVAL_DAYS,
};
use learner_progress::models::srs::{GRADUATION_EASE, GRADUATION_REPETITIONS};
use learner_progress::models::{
    ChunkRecord, ChunkStatus, Outcome, calculate_next_review, calculate_topic_health, growth_stage,
    health_from_elapsed_days,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_status() -> impl Strategy<Value = ChunkStatus> {
    prop_oneof![
        Just(ChunkStatus::New),
        Just(ChunkStatus::Learning),
        Just(ChunkStatus::Acquired),
        Just(ChunkStatus::Fragile),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::CorrectUnaided),
        Just(Outcome::CorrectAided),
        Just(Outcome::Incorrect),
    ]
}

/// Includes out-of-range stored values, as a corrupted record might hold.
fn arb_chunk() -> impl Strategy<Value = ChunkRecord> {
    (arb_status(), -5.0f64..10.0, 0u32..=1000, 0u32..=50).prop_map(
        |(status, ease_factor, interval_days, repetitions)| ChunkRecord {
            status,
            ease_factor,
            interval_days,
            repetitions,
            ..ChunkRecord::new("kid-1", "chunk", "topic")
        },
    )
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

// ============================================================================
// Scheduler
// ============================================================================

proptest! {
    #[test]
    fn prop_ease_and_interval_stay_in_bounds(chunk in arb_chunk(), outcome in arb_outcome()) {
        let next = calculate_next_review(&chunk, outcome, now());
        prop_assert!(next.ease_factor >= MIN_EASE_FACTOR && next.ease_factor <= MAX_EASE_FACTOR);
        prop_assert!(
            next.interval_days >= MIN_INTERVAL_DAYS && next.interval_days <= MAX_INTERVAL_DAYS
        );
    }

    #[test]
    fn prop_status_follows_graph(chunk in arb_chunk(), outcome in arb_outcome()) {
        let next = calculate_next_review(&chunk, outcome, now());
        prop_assert!(chunk.status.can_transition_to(next.status));
        prop_assert_ne!(next.status, ChunkStatus::New);
    }

    #[test]
    fn prop_acquired_requires_graduation_bar(chunk in arb_chunk(), outcome in arb_outcome()) {
        let next = calculate_next_review(&chunk, outcome, now());
        if next.status == ChunkStatus::Acquired && chunk.status != ChunkStatus::Acquired {
            prop_assert_eq!(outcome, Outcome::CorrectUnaided);
            prop_assert!(next.repetitions >= GRADUATION_REPETITIONS);
            prop_assert!(next.ease_factor >= GRADUATION_EASE);
        }
    }

    #[test]
    fn prop_incorrect_resets(chunk in arb_chunk()) {
        let next = calculate_next_review(&chunk, Outcome::Incorrect, now());
        prop_assert_eq!(next.interval_days, 1);
        prop_assert_eq!(next.repetitions, 0);
        if chunk.status == ChunkStatus::Acquired {
            prop_assert_eq!(next.status, ChunkStatus::Fragile);
        }
    }

    #[test]
    fn prop_aided_never_counts_a_repetition(chunk in arb_chunk()) {
        let next = calculate_next_review(&chunk, Outcome::CorrectAided, now());
        prop_assert_eq!(next.repetitions, chunk.repetitions);
    }

    #[test]
    fn prop_encounter_stamps_review_time(chunk in arb_chunk(), outcome in arb_outcome()) {
        let next = calculate_next_review(&chunk, outcome, now());
        prop_assert_eq!(next.last_reviewed, Some(now()));
    }
}

// ============================================================================
// Decay, growth, topic health
// ============================================================================

proptest! {
    #[test]
    fn prop_decay_is_monotone(d1 in -1000i64..1000, d2 in -1000i64..1000) {
        let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        prop_assert!(health_from_elapsed_days(lo) >= health_from_elapsed_days(hi));
    }

    #[test]
    fn prop_decay_is_pure_and_bounded(days in any::<i64>()) {
        let first = health_from_elapsed_days(days);
        prop_assert_eq!(first, health_from_elapsed_days(days));
        prop_assert!((5..=100).contains(&first));
    }

    #[test]
    fn prop_growth_is_monotone(c1 in any::<u64>(), c2 in any::<u64>()) {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        prop_assert!(growth_stage(lo) <= growth_stage(hi));
        prop_assert_eq!(growth_stage(lo), growth_stage(lo));
    }

    #[test]
    fn prop_topic_health_ignores_order(statuses in prop::collection::vec(arb_status(), 0..40)) {
        let forward = calculate_topic_health(statuses.iter().copied());
        let backward = calculate_topic_health(statuses.iter().rev().copied());
        prop_assert_eq!(forward, backward);
        prop_assert!((30..=100).contains(&forward) || statuses.is_empty());
    }
}

#[test]
fn topic_health_fixed_points() {
    assert_eq!(calculate_topic_health(Vec::<ChunkStatus>::new()), 50);
    assert_eq!(
        calculate_topic_health([
            ChunkStatus::Acquired,
            ChunkStatus::Acquired,
            ChunkStatus::Acquired,
        ]),
        100
    );
    assert_eq!(calculate_topic_health([ChunkStatus::Fragile, ChunkStatus::Fragile]), 30);
}

#[test]
fn decay_scenarios() {
    assert_eq!(health_from_elapsed_days(-5), 100);
    assert_eq!(health_from_elapsed_days(100), 5);
}
