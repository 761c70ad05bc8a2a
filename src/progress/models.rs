//! Study session and progress data models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

pub const MAX_SESSION_QUESTIONS: i64 = 200;
pub const DEFAULT_HISTORY_DAYS: i64 = 7;
pub const MAX_HISTORY_DAYS: i64 = 365;

/// Kind of study activity, shared by sessions and progress logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyMode {
    Review,
    MultipleChoice,
    Matching,
    Listening,
    Spelling,
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Review => "review",
            StudyMode::MultipleChoice => "multipleChoice",
            StudyMode::Matching => "matching",
            StudyMode::Listening => "listening",
            StudyMode::Spelling => "spelling",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(StudyMode::Review),
            "multipleChoice" => Ok(StudyMode::MultipleChoice),
            "matching" => Ok(StudyMode::Matching),
            "listening" => Ok(StudyMode::Listening),
            "spelling" => Ok(StudyMode::Spelling),
            other => Err(format!("unknown study mode '{}'", other)),
        }
    }
}

/// Session lifecycle; configuration happens client-side before start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    InProgress,
    Complete,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "inProgress",
            SessionStatus::Complete => "complete",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inProgress" => Ok(SessionStatus::InProgress),
            "complete" => Ok(SessionStatus::Complete),
            other => Err(format!("unknown session status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: StudyMode,
    pub status: SessionStatus,
    pub total_questions: i64,
    pub answered_count: i64,
    pub correct_answers: i64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
    /// Share of answered questions that were correct
    pub fn accuracy(&self) -> f64 {
        if self.answered_count == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.answered_count as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub mode: StudyMode,
    pub total_questions: i64,
}

impl StartSessionRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.in_range("totalQuestions", self.total_questions, 1, MAX_SESSION_QUESTIONS);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswerRequest {
    pub vocabulary_id: Option<Uuid>,
    pub correct: bool,
}

/// One study attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vocabulary_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub activity: StudyMode,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProgressLog {
    pub user_id: Uuid,
    pub vocabulary_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub activity: StudyMode,
    pub correct: bool,
}

/// Result of answering inside a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswer {
    pub session: StudySession,
    pub log: ProgressLog,
}

/// Dashboard numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_vocabulary: i64,
    pub learned_count: i64,
    pub due_count: i64,
    pub reviews_today: i64,
    pub correct_today: i64,
    /// Correct share of all logged attempts, 0..=1
    pub accuracy: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub sessions_completed: i64,
}

/// Activity of a single UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub reviews: i64,
    pub correct: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub days: Option<i64>,
}

impl HistoryQuery {
    pub fn days(&self) -> Result<i64, ValidationErrors> {
        let days = self.days.unwrap_or(DEFAULT_HISTORY_DAYS);
        let mut errors = ValidationErrors::new();
        errors.in_range("days", days, 1, MAX_HISTORY_DAYS);
        errors.into_result().map(|_| days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_string_forms_agree() {
        for mode in [
            StudyMode::Review,
            StudyMode::MultipleChoice,
            StudyMode::Matching,
            StudyMode::Listening,
            StudyMode::Spelling,
        ] {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, mode.as_str());
            assert_eq!(mode.as_str().parse::<StudyMode>().unwrap(), mode);
        }
        assert!("quiz".parse::<StudyMode>().is_err());
    }

    #[test]
    fn test_history_days_bounds() {
        assert_eq!(HistoryQuery::default().days().unwrap(), 7);
        assert_eq!(HistoryQuery { days: Some(365) }.days().unwrap(), 365);
        assert!(HistoryQuery { days: Some(0) }.days().is_err());
        assert!(HistoryQuery { days: Some(366) }.days().is_err());
    }

    #[test]
    fn test_start_request_validation() {
        let request = StartSessionRequest {
            mode: StudyMode::Matching,
            total_questions: 0,
        };
        assert_eq!(request.validate().unwrap_err().fields[0].field, "totalQuestions");
    }
}
