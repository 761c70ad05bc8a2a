//! Goals storage implementation

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::models::*;
use crate::progress::storage::day_start;
use crate::storage::{now, time_column, time_to_sql, uuid_column, Database, Result};

impl Database {
    /// Stored goal, or the defaults when the user never saved one
    pub fn get_goal(&self, user_id: Uuid) -> Result<DailyGoal> {
        let goal = self
            .conn()
            .query_row(
                "SELECT user_id, target_reviews, target_new_words, updated_at
                 FROM daily_goals WHERE user_id = ?1",
                [user_id.to_string()],
                |row| {
                    Ok(DailyGoal {
                        user_id: uuid_column(row, 0)?,
                        target_reviews: row.get(1)?,
                        target_new_words: row.get(2)?,
                        updated_at: Some(time_column(row, 3)?),
                    })
                },
            )
            .optional()?;
        Ok(goal.unwrap_or_else(|| DailyGoal::defaults(user_id)))
    }

    /// Create or update the user's goal; absent fields keep their current value
    pub fn upsert_goal(&self, user_id: Uuid, updates: UpdateGoalRequest) -> Result<DailyGoal> {
        updates.validate()?;

        let mut goal = self.get_goal(user_id)?;
        if let Some(reviews) = updates.target_reviews {
            goal.target_reviews = reviews;
        }
        if let Some(words) = updates.target_new_words {
            goal.target_new_words = words;
        }
        let updated_at = now();
        goal.updated_at = Some(updated_at);

        self.conn().execute(
            "INSERT INTO daily_goals (user_id, target_reviews, target_new_words, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                target_reviews = excluded.target_reviews,
                target_new_words = excluded.target_new_words,
                updated_at = excluded.updated_at",
            params![
                user_id.to_string(),
                goal.target_reviews,
                goal.target_new_words,
                time_to_sql(&updated_at),
            ],
        )?;

        Ok(goal)
    }

    /// Goal together with the progress made on the UTC day of `at`
    pub fn goal_status(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<GoalStatus> {
        let goal = self.get_goal(user_id)?;
        let since = day_start(at.date_naive());
        let (reviews_done, _) = self.count_attempts_since(user_id, since)?;
        let new_words_added = self.count_vocabulary_created_since(user_id, since)?;

        Ok(GoalStatus {
            today: GoalProgress::new(&goal, reviews_done, new_words_added),
            goal,
        })
    }
}
