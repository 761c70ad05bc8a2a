//! Quiz generators and answer checking
//!
//! Everything here is pure: callers load the candidate vocabulary and pass
//! in the random number generator, which keeps the builders deterministic
//! under a seeded RNG.

pub mod answers;
pub mod distractors;
pub mod kana;
pub mod matching;
pub mod models;
pub mod questions;

pub use answers::{check_answer, check_meaning, check_reading};
pub use distractors::generate_distractors;
pub use kana::normalize_kana;
pub use matching::{build_matching_round, is_matching_pair};
pub use models::*;
pub use questions::{
    build_listening_question, build_listening_quiz, build_multiple_choice,
    build_multiple_choice_quiz,
};
