//! Notification and preference persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::storage::{
    now, parsed_column, time_column, time_to_sql, uuid_column, Database, Result, StorageError,
};

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, body, read, created_at";

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        kind: parsed_column(row, 2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        read: row.get(5)?,
        created_at: time_column(row, 6)?,
    })
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::NotFound(format!("Notification {} not found", id))
}

fn find_notification(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<Notification> {
    conn.query_row(
        &format!(
            "SELECT {} FROM notifications WHERE id = ?1 AND user_id = ?2",
            NOTIFICATION_COLUMNS
        ),
        params![id.to_string(), user_id.to_string()],
        notification_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

impl Database {
    pub fn create_notification(&self, user_id: Uuid, new: NewNotification) -> Result<Notification> {
        new.validate()?;

        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            kind: new.kind,
            title: new.title.trim().to_string(),
            body: new.body,
            read: false,
            created_at: now(),
        };

        self.conn().execute(
            "INSERT INTO notifications (id, user_id, kind, title, body, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                notification.id.to_string(),
                notification.user_id.to_string(),
                notification.kind.as_str(),
                notification.title,
                notification.body,
                time_to_sql(&notification.created_at),
            ],
        )?;

        Ok(notification)
    }

    /// Newest first, capped at [`NOTIFICATION_LIST_LIMIT`]
    pub fn list_notifications(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
        let filter = if unread_only { " AND read = 0" } else { "" };
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM notifications WHERE user_id = ?1{}
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            NOTIFICATION_COLUMNS, filter
        ))?;
        let notifications = stmt
            .query_map(
                params![user_id.to_string(), NOTIFICATION_LIST_LIMIT as i64],
                notification_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notifications)
    }

    pub fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification> {
        let updated = self.conn().execute(
            "UPDATE notifications SET read = 1 WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if updated == 0 {
            return Err(not_found(id));
        }
        find_notification(self.conn(), user_id, id)
    }

    /// Returns how many notifications changed
    pub fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<usize> {
        let updated = self.conn().execute(
            "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
            [user_id.to_string()],
        )?;
        Ok(updated)
    }

    pub fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let removed = self.conn().execute(
            "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if removed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Stored preferences, or the defaults when never saved
    pub fn get_notification_preferences(&self, user_id: Uuid) -> Result<NotificationPreferences> {
        let preferences = self
            .conn()
            .query_row(
                "SELECT user_id, enabled, reminder_time, due_reminders, goal_reminders, updated_at
                 FROM notification_preferences WHERE user_id = ?1",
                [user_id.to_string()],
                |row| {
                    Ok(NotificationPreferences {
                        user_id: uuid_column(row, 0)?,
                        enabled: row.get(1)?,
                        reminder_time: row.get(2)?,
                        due_reminders: row.get(3)?,
                        goal_reminders: row.get(4)?,
                        updated_at: Some(time_column(row, 5)?),
                    })
                },
            )
            .optional()?;
        Ok(preferences.unwrap_or_else(|| NotificationPreferences::defaults(user_id)))
    }

    pub fn upsert_notification_preferences(
        &self,
        user_id: Uuid,
        updates: UpdatePreferencesRequest,
    ) -> Result<NotificationPreferences> {
        updates.validate()?;

        let mut preferences = self.get_notification_preferences(user_id)?;
        if let Some(enabled) = updates.enabled {
            preferences.enabled = enabled;
        }
        if let Some(time) = updates.reminder_time {
            preferences.reminder_time = time;
        }
        if let Some(due) = updates.due_reminders {
            preferences.due_reminders = due;
        }
        if let Some(goal) = updates.goal_reminders {
            preferences.goal_reminders = goal;
        }
        let updated_at = now();
        preferences.updated_at = Some(updated_at);

        self.conn().execute(
            "INSERT INTO notification_preferences
                (user_id, enabled, reminder_time, due_reminders, goal_reminders, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                enabled = excluded.enabled,
                reminder_time = excluded.reminder_time,
                due_reminders = excluded.due_reminders,
                goal_reminders = excluded.goal_reminders,
                updated_at = excluded.updated_at",
            params![
                user_id.to_string(),
                preferences.enabled,
                preferences.reminder_time,
                preferences.due_reminders,
                preferences.goal_reminders,
                time_to_sql(&updated_at),
            ],
        )?;

        Ok(preferences)
    }

    /// Record a reminder about due reviews when the user wants one
    ///
    /// Returns `None` when reminders are off or nothing is due.
    pub fn create_due_reminder(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<Option<Notification>> {
        let preferences = self.get_notification_preferences(user_id)?;
        if !preferences.enabled || !preferences.due_reminders {
            return Ok(None);
        }

        let due = self.due_vocabulary(user_id, 0, at)?.total_due;
        if due == 0 {
            return Ok(None);
        }

        let noun = if due == 1 { "word" } else { "words" };
        let notification = self.create_notification(
            user_id,
            NewNotification {
                kind: NotificationKind::DueReminder,
                title: "Time to review".to_string(),
                body: format!("You have {} {} due for review.", due, noun),
            },
        )?;
        log::debug!("Created due reminder for user {} ({} due)", user_id, due);
        Ok(Some(notification))
    }
}
