//! Vocabulary groups and their ordered membership

pub mod models;
pub mod storage;

pub use models::*;
