//! Spaced repetition scheduling for vocabulary items
//!
//! This module provides:
//! - The per-item `ReviewSchedule` (easiness factor, interval, repetitions)
//! - The SM-2 algorithm used to reschedule an item after a review
//! - Schedule persistence and due-item queries

pub mod algorithm;
pub mod models;
pub mod storage;

pub use models::*;
