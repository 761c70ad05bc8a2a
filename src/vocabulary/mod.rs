//! Vocabulary items: CRUD, cursor pagination, due items and reviews

pub mod cursor;
pub mod models;
pub mod storage;

pub use models::*;
