//! SM-2 scheduling for vocabulary reviews
//!
//! A review is graded 0 to 5. Grades of 3 and up keep the item's streak of
//! repetitions going and stretch the interval; anything lower sends the
//! word back to a one-day interval. The easiness factor drifts with every
//! grade and never drops below [`MIN_EASINESS_FACTOR`].

use chrono::{DateTime, Duration, Utc};

use super::models::ReviewSchedule;

/// Minimum easiness factor allowed
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Lowest quality that counts as a correct answer
pub const PASSING_QUALITY: i32 = 3;

/// Repetitions and interval at which an item counts as learned
pub(crate) const LEARNED_REPETITIONS: i64 = 3;
pub(crate) const LEARNED_INTERVAL_DAYS: i64 = 21;

/// Apply one review to a schedule and return the updated schedule
///
/// # Arguments
/// * `schedule` - Current schedule
/// * `quality` - Quality rating, clamped to 0-5
/// * `reviewed_at` - Time of the review; the next due date is relative to it
pub fn apply_review(
    schedule: &ReviewSchedule,
    quality: i32,
    reviewed_at: DateTime<Utc>,
) -> ReviewSchedule {
    let quality = quality.clamp(0, 5);

    let (interval, repetitions) = if quality >= PASSING_QUALITY {
        let interval = match schedule.repetitions {
            0 => 1,
            1 => 6,
            _ => (schedule.interval as f64 * schedule.easiness_factor).round() as i64,
        };
        (interval, schedule.repetitions + 1)
    } else {
        // Incorrect response - start the item over
        (1, 0)
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let miss = (5 - quality) as f64;
    let easiness_factor =
        (schedule.easiness_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS_FACTOR);

    ReviewSchedule {
        vocabulary_id: schedule.vocabulary_id,
        easiness_factor,
        interval,
        repetitions,
        next_review: reviewed_at + Duration::days(interval),
        last_reviewed: Some(reviewed_at),
    }
}

/// Interval each answer would produce, for qualities 1 (again), 3 (hard), 4 (good), 5 (easy)
pub fn preview_intervals(schedule: &ReviewSchedule, now: DateTime<Utc>) -> [i64; 4] {
    [1, 3, 4, 5].map(|quality| apply_review(schedule, quality, now).interval)
}

/// Whether the item has graduated into long-term review
pub fn is_learned(schedule: &ReviewSchedule) -> bool {
    schedule.repetitions >= LEARNED_REPETITIONS && schedule.interval >= LEARNED_INTERVAL_DAYS
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
