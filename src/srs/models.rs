//! Data models for spaced repetition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Starting SM-2 easiness factor
pub const DEFAULT_EASINESS_FACTOR: f64 = 2.5;

/// Spaced repetition state for one vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub vocabulary_id: Uuid,
    /// SM-2 easiness factor, never below 1.3
    pub easiness_factor: f64,
    /// Current interval in days
    pub interval: i64,
    /// Consecutive correct reviews
    pub repetitions: i64,
    /// When the item is next due
    pub next_review: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewSchedule {
    /// A fresh schedule, due immediately
    pub fn new(vocabulary_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            vocabulary_id,
            easiness_factor: DEFAULT_EASINESS_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review: now,
            last_reviewed: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// Body of `POST /api/vocabulary/{id}/review`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// SM-2 quality rating (0-5)
    /// 0 = complete blackout
    /// 3 = correct with serious difficulty
    /// 5 = perfect response
    pub quality: i32,
}

/// Outcome returned after a review is applied
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub schedule: ReviewSchedule,
    pub correct: bool,
    /// Human readable next interval, e.g. "6d"
    pub next_interval: String,
}
