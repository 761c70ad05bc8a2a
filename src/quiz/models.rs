//! Quiz question and answer types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MAX_QUESTION_COUNT: usize = 50;
pub const DEFAULT_OPTION_COUNT: usize = 4;
pub const MIN_OPTION_COUNT: usize = 2;
pub const MAX_OPTION_COUNT: usize = 6;
pub const DEFAULT_PAIR_COUNT: usize = 6;
pub const MAX_PAIR_COUNT: usize = 12;

/// Smallest pool a quiz can be built from
pub const MIN_QUIZ_ITEMS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("not enough vocabulary: need at least {needed} items, have {available}")]
    NotEnoughVocabulary { needed: usize, available: usize },

    #[error("not enough vocabulary: every item has the answer \"{0}\"")]
    NoDistinctAnswers(String),
}

/// What is shown and what is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizDirection {
    #[default]
    WordToMeaning,
    MeaningToWord,
    ReadingToWord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceQuestion {
    pub vocabulary_id: Uuid,
    pub direction: QuizDirection,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Listening question: the reading is spoken, the word is picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningQuestion {
    pub vocabulary_id: Uuid,
    /// Text handed to speech synthesis
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingCard {
    pub vocabulary_id: Uuid,
    pub text: String,
}

/// Word cards on the left, meaning cards shuffled independently on the right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingRound {
    pub left: Vec<MatchingCard>,
    pub right: Vec<MatchingCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckMode {
    Reading,
    Meaning,
    Spelling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    pub vocabulary_id: Uuid,
    pub mode: CheckMode,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub correct: bool,
    pub expected: String,
}

/// Query string of `GET /api/quiz/multiple-choice`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceQuery {
    pub count: Option<usize>,
    pub option_count: Option<usize>,
    pub direction: Option<QuizDirection>,
    pub group_id: Option<Uuid>,
}

/// Query string of `GET /api/quiz/matching`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingQuery {
    pub pairs: Option<usize>,
    pub group_id: Option<Uuid>,
}

/// Query string of `GET /api/quiz/listening`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningQuery {
    pub count: Option<usize>,
    pub group_id: Option<Uuid>,
}
