//! In-app notifications and reminder preferences
//!
//! Only the records are kept here; nothing is pushed to devices.

pub mod models;
pub mod storage;

pub use models::*;
