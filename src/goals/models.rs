//! Daily goal data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

pub const DEFAULT_TARGET_REVIEWS: i64 = 20;
pub const DEFAULT_TARGET_NEW_WORDS: i64 = 5;
pub const MAX_TARGET_REVIEWS: i64 = 500;
pub const MAX_TARGET_NEW_WORDS: i64 = 100;

/// Per-user daily targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoal {
    pub user_id: Uuid,
    pub target_reviews: i64,
    pub target_new_words: i64,
    /// `None` until the user saves a goal
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyGoal {
    /// Targets used when the user never set any
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            target_reviews: DEFAULT_TARGET_REVIEWS,
            target_new_words: DEFAULT_TARGET_NEW_WORDS,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub target_reviews: Option<i64>,
    pub target_new_words: Option<i64>,
}

impl UpdateGoalRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(reviews) = self.target_reviews {
            errors.in_range("targetReviews", reviews, 1, MAX_TARGET_REVIEWS);
        }
        if let Some(words) = self.target_new_words {
            errors.in_range("targetNewWords", words, 0, MAX_TARGET_NEW_WORDS);
        }
        errors.into_result()
    }
}

/// How far today's activity is towards the goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub reviews_done: i64,
    pub new_words_added: i64,
    pub reviews_met: bool,
    pub new_words_met: bool,
}

impl GoalProgress {
    pub fn new(goal: &DailyGoal, reviews_done: i64, new_words_added: i64) -> Self {
        Self {
            reviews_done,
            new_words_added,
            reviews_met: reviews_done >= goal.target_reviews,
            new_words_met: new_words_added >= goal.target_new_words,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStatus {
    pub goal: DailyGoal,
    pub today: GoalProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_ranges() {
        let ok = UpdateGoalRequest {
            target_reviews: Some(500),
            target_new_words: Some(0),
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateGoalRequest {
            target_reviews: Some(0),
            target_new_words: Some(101),
        };
        let fields: Vec<_> = bad
            .validate()
            .unwrap_err()
            .fields
            .into_iter()
            .map(|f| f.field)
            .collect();
        assert_eq!(fields, vec!["targetReviews", "targetNewWords"]);
    }

    #[test]
    fn test_progress_flags() {
        let goal = DailyGoal::defaults(Uuid::nil());
        let progress = GoalProgress::new(&goal, 20, 4);
        assert!(progress.reviews_met);
        assert!(!progress.new_words_met);
    }
}
