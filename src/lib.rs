//! Vocabulary learning backend
//!
//! Japanese vocabulary with SM-2 spaced repetition, quizzes, study
//! sessions, daily goals and notifications, stored in SQLite and served
//! over a JSON REST API.

pub mod api;
pub mod config;
pub mod goals;
pub mod groups;
pub mod notifications;
pub mod progress;
pub mod quiz;
pub mod sentences;
pub mod srs;
pub mod storage;
pub mod users;
pub mod validation;
pub mod vocabulary;

pub use config::Config;
pub use storage::Database;
