//! User persistence

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::models::{normalize_email, User};
use crate::storage::{
    is_unique_violation, now, time_column, time_to_sql, uuid_column, Database, Result,
    StorageError,
};
use crate::validation::ValidationErrors;

const USER_COLUMNS: &str = "id, email, name, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: time_column(row, 3)?,
    })
}

impl Database {
    /// Create a user; the email must be unused
    pub fn create_user(&self, email: &str, name: Option<String>) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationErrors::single("email", "must be a valid email address").into());
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: now(),
        };

        self.conn()
            .execute(
                "INSERT INTO users (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.id.to_string(),
                    user.email,
                    user.name,
                    time_to_sql(&user.created_at)
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::Conflict(format!("Email already registered: {}", user.email))
                } else {
                    e.into()
                }
            })?;

        log::info!("Created user {}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.find_user(id)?
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", id)))
    }

    /// Lookup used by request authentication; absence is not an error
    pub fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                [id.to_string()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                [normalize_email(email)],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }
}
