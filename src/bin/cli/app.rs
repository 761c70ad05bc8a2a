use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use vocab_hero_lib::storage::Database;
use vocab_hero_lib::users::User;

/// Shared state for CLI commands
pub struct App {
    pub db: Database,
}

impl App {
    /// Open the given database file, or the default one
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Database::default_path().context("Failed to get data directory")?,
        };
        let db = Database::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Ok(Self { db })
    }

    /// Look a user up by email, failing when there is none
    pub fn user(&self, email: &str) -> Result<User> {
        let user = self
            .db
            .find_user_by_email(email)
            .context("Failed to look up user")?;
        match user {
            Some(user) => Ok(user),
            None => bail!("No user with email '{}'. Create one with `vocab-cli user-add`.", email),
        }
    }
}
