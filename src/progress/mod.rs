//! Study sessions, progress logs and learning statistics

pub mod models;
pub mod storage;
pub mod streaks;

pub use models::*;
