//! User accounts

pub mod models;
pub mod storage;

pub use models::*;
