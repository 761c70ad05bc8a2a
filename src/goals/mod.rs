//! Daily study goals

pub mod models;
pub mod storage;

pub use models::*;
