use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationErrors;

pub const NOTIFICATION_LIST_LIMIT: usize = 50;
pub const DEFAULT_REMINDER_TIME: &str = "09:00";
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_BODY_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    DueReminder,
    GoalReminder,
    Achievement,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::DueReminder => "dueReminder",
            NotificationKind::GoalReminder => "goalReminder",
            NotificationKind::Achievement => "achievement",
            NotificationKind::System => "system",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dueReminder" => Ok(NotificationKind::DueReminder),
            "goalReminder" => Ok(NotificationKind::GoalReminder),
            "achievement" => Ok(NotificationKind::Achievement),
            "system" => Ok(NotificationKind::System),
            other => Err(format!("unknown notification kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl NewNotification {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("title", &self.title, MAX_TITLE_LEN);
        errors.max_len("body", &self.body, MAX_BODY_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResult {
    pub updated: usize,
}

/// Per-user reminder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub user_id: Uuid,
    pub enabled: bool,
    /// Local time of the daily reminder, `HH:MM`
    pub reminder_time: String,
    pub due_reminders: bool,
    pub goal_reminders: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationPreferences {
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            enabled: true,
            reminder_time: DEFAULT_REMINDER_TIME.to_string(),
            due_reminders: true,
            goal_reminders: true,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub enabled: Option<bool>,
    pub reminder_time: Option<String>,
    pub due_reminders: Option<bool>,
    pub goal_reminders: Option<bool>,
}

impl UpdatePreferencesRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(time) = &self.reminder_time {
            if !is_reminder_time(time) {
                errors.add("reminderTime", "must be a 24-hour time formatted as HH:MM");
            }
        }
        errors.into_result()
    }
}

/// Strict `HH:MM`, 00:00 through 23:59
pub fn is_reminder_time(value: &str) -> bool {
    value.len() == 5
        && value.as_bytes()[2] == b':'
        && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}
