use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::storage::{self, Database};

use super::response::ApiError;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    /// Run one storage call while holding the database lock
    pub fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> storage::Result<T>,
    {
        let db = self
            .db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
        Ok(f(&db)?)
    }
}
