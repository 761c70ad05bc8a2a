//! Database schema creation and versioning

use rusqlite::Connection;

use super::database::Result;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Enable foreign keys and create or migrate the schema
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let current = schema_version(conn)?;
    if current == 0 {
        log::info!("Initializing database schema v{}", SCHEMA_VERSION);
        conn.execute_batch(SCHEMA_V1)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
            [SCHEMA_VERSION],
        )?;
    } else if current > SCHEMA_VERSION {
        log::warn!(
            "Database schema v{} is newer than supported v{}",
            current,
            SCHEMA_VERSION
        );
    } else {
        log::debug!("Database schema is up to date (v{})", current);
    }

    Ok(())
}

fn schema_version(conn: &Connection) -> Result<i32> {
    let exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);
    Ok(version)
}

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vocabulary_items (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    word TEXT NOT NULL,
    reading TEXT NOT NULL,
    meaning TEXT NOT NULL,
    part_of_speech TEXT,
    jlpt_level INTEGER,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_vocabulary_user_created
    ON vocabulary_items(user_id, created_at DESC, id DESC);

CREATE TABLE IF NOT EXISTS review_schedules (
    vocabulary_id TEXT PRIMARY KEY REFERENCES vocabulary_items(id) ON DELETE CASCADE,
    easiness_factor REAL NOT NULL DEFAULT 2.5,
    interval_days INTEGER NOT NULL DEFAULT 0,
    repetitions INTEGER NOT NULL DEFAULT 0,
    next_review TEXT NOT NULL,
    last_reviewed TEXT
);
CREATE INDEX IF NOT EXISTS idx_review_next ON review_schedules(next_review);

CREATE TABLE IF NOT EXISTS example_sentences (
    id TEXT PRIMARY KEY,
    vocabulary_id TEXT NOT NULL REFERENCES vocabulary_items(id) ON DELETE CASCADE,
    sentence TEXT NOT NULL,
    translation TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sentences_vocabulary ON example_sentences(vocabulary_id);

CREATE TABLE IF NOT EXISTS vocabulary_groups (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, name)
);

CREATE TABLE IF NOT EXISTS group_members (
    group_id TEXT NOT NULL REFERENCES vocabulary_groups(id) ON DELETE CASCADE,
    vocabulary_id TEXT NOT NULL REFERENCES vocabulary_items(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    PRIMARY KEY (group_id, vocabulary_id)
);
CREATE INDEX IF NOT EXISTS idx_group_members_vocabulary ON group_members(vocabulary_id);

CREATE TABLE IF NOT EXISTS daily_goals (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    target_reviews INTEGER NOT NULL,
    target_new_words INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    read INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at DESC);

CREATE TABLE IF NOT EXISTS notification_preferences (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    enabled INTEGER NOT NULL,
    reminder_time TEXT NOT NULL,
    due_reminders INTEGER NOT NULL,
    goal_reminders INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS study_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    mode TEXT NOT NULL,
    status TEXT NOT NULL,
    total_questions INTEGER NOT NULL,
    answered INTEGER NOT NULL DEFAULT 0,
    correct_answers INTEGER NOT NULL DEFAULT 0,
    started_at TEXT NOT NULL,
    completed_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON study_sessions(user_id, started_at DESC);

CREATE TABLE IF NOT EXISTS progress_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    vocabulary_id TEXT REFERENCES vocabulary_items(id) ON DELETE SET NULL,
    session_id TEXT REFERENCES study_sessions(id) ON DELETE SET NULL,
    activity TEXT NOT NULL,
    correct INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_progress_user_created ON progress_logs(user_id, created_at);
"#;
