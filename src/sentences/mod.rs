//! Example sentences attached to vocabulary items

pub mod models;
pub mod storage;

pub use models::*;
