//! Session, progress log and statistics persistence

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use super::streaks::{current_streak, longest_streak};
use crate::srs::algorithm::{LEARNED_INTERVAL_DAYS, LEARNED_REPETITIONS};
use crate::storage::{
    now, opt_time_column, opt_uuid_column, parsed_column, time_column, time_to_sql, uuid_column,
    Database, Result, StorageError,
};
use crate::vocabulary::storage::ensure_vocabulary_owned;

const SESSION_COLUMNS: &str = "id, user_id, mode, status, total_questions, answered, \
     correct_answers, started_at, completed_at";

/// Midnight UTC starting `date`
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<StudySession> {
    Ok(StudySession {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        mode: parsed_column(row, 2)?,
        status: parsed_column(row, 3)?,
        total_questions: row.get(4)?,
        answered_count: row.get(5)?,
        correct_answers: row.get(6)?,
        started_at: time_column(row, 7)?,
        completed_at: opt_time_column(row, 8)?,
    })
}

fn find_session(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<StudySession> {
    conn.query_row(
        &format!(
            "SELECT {} FROM study_sessions WHERE id = ?1 AND user_id = ?2",
            SESSION_COLUMNS
        ),
        params![id.to_string(), user_id.to_string()],
        session_from_row,
    )
    .optional()?
    .ok_or_else(|| StorageError::NotFound(format!("Session {} not found", id)))
}

/// Append one attempt to the progress log
pub(crate) fn insert_log(conn: &Connection, entry: NewProgressLog) -> Result<ProgressLog> {
    let log = ProgressLog {
        id: Uuid::new_v4(),
        user_id: entry.user_id,
        vocabulary_id: entry.vocabulary_id,
        session_id: entry.session_id,
        activity: entry.activity,
        correct: entry.correct,
        created_at: now(),
    };

    conn.execute(
        "INSERT INTO progress_logs (id, user_id, vocabulary_id, session_id, activity, correct, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.user_id.to_string(),
            log.vocabulary_id.map(|id| id.to_string()),
            log.session_id.map(|id| id.to_string()),
            log.activity.as_str(),
            log.correct,
            time_to_sql(&log.created_at),
        ],
    )?;

    Ok(log)
}

impl Database {
    pub fn start_session(&self, user_id: Uuid, request: StartSessionRequest) -> Result<StudySession> {
        request.validate()?;

        let session = StudySession {
            id: Uuid::new_v4(),
            user_id,
            mode: request.mode,
            status: SessionStatus::InProgress,
            total_questions: request.total_questions,
            answered_count: 0,
            correct_answers: 0,
            started_at: now(),
            completed_at: None,
        };

        self.conn().execute(
            "INSERT INTO study_sessions (id, user_id, mode, status, total_questions, answered, correct_answers, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)",
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                session.mode.as_str(),
                session.status.as_str(),
                session.total_questions,
                time_to_sql(&session.started_at),
            ],
        )?;

        log::debug!("Started {} session {}", session.mode, session.id);
        Ok(session)
    }

    pub fn get_session(&self, user_id: Uuid, id: Uuid) -> Result<StudySession> {
        find_session(self.conn(), user_id, id)
    }

    /// Most recent sessions first
    pub fn list_sessions(&self, user_id: Uuid, limit: usize) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM study_sessions WHERE user_id = ?1
             ORDER BY started_at DESC, id DESC LIMIT ?2",
            SESSION_COLUMNS
        ))?;
        let sessions = stmt
            .query_map(params![user_id.to_string(), limit as i64], session_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Count one answer towards an in-progress session and log it
    pub fn record_answer(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        request: RecordAnswerRequest,
    ) -> Result<SessionAnswer> {
        self.transaction(|tx| {
            let mut session = find_session(tx, user_id, session_id)?;
            if session.status != SessionStatus::InProgress {
                return Err(StorageError::Conflict(format!(
                    "Session {} is already complete",
                    session_id
                )));
            }
            if session.answered_count >= session.total_questions {
                return Err(StorageError::Conflict(format!(
                    "Session {} already has all {} answers",
                    session_id, session.total_questions
                )));
            }
            if let Some(vocabulary_id) = request.vocabulary_id {
                ensure_vocabulary_owned(tx, user_id, vocabulary_id)?;
            }

            session.answered_count += 1;
            if request.correct {
                session.correct_answers += 1;
            }
            tx.execute(
                "UPDATE study_sessions SET answered = ?2, correct_answers = ?3 WHERE id = ?1",
                params![
                    session.id.to_string(),
                    session.answered_count,
                    session.correct_answers
                ],
            )?;

            let log = insert_log(
                tx,
                NewProgressLog {
                    user_id,
                    vocabulary_id: request.vocabulary_id,
                    session_id: Some(session.id),
                    activity: session.mode,
                    correct: request.correct,
                },
            )?;

            Ok(SessionAnswer { session, log })
        })
    }

    pub fn complete_session(&self, user_id: Uuid, id: Uuid) -> Result<StudySession> {
        let mut session = find_session(self.conn(), user_id, id)?;
        if session.status == SessionStatus::Complete {
            return Err(StorageError::Conflict(format!(
                "Session {} is already complete",
                id
            )));
        }

        session.status = SessionStatus::Complete;
        session.completed_at = Some(now());
        self.conn().execute(
            "UPDATE study_sessions SET status = ?2, completed_at = ?3 WHERE id = ?1",
            params![
                session.id.to_string(),
                session.status.as_str(),
                session.completed_at.as_ref().map(time_to_sql),
            ],
        )?;

        log::debug!(
            "Completed session {} ({}/{} correct)",
            session.id,
            session.correct_answers,
            session.answered_count
        );
        Ok(session)
    }

    /// Progress log entries, newest first
    pub fn recent_logs(&self, user_id: Uuid, limit: usize) -> Result<Vec<ProgressLog>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, vocabulary_id, session_id, activity, correct, created_at
             FROM progress_logs WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let logs = stmt
            .query_map(params![user_id.to_string(), limit as i64], |row| {
                Ok(ProgressLog {
                    id: uuid_column(row, 0)?,
                    user_id: uuid_column(row, 1)?,
                    vocabulary_id: opt_uuid_column(row, 2)?,
                    session_id: opt_uuid_column(row, 3)?,
                    activity: parsed_column(row, 4)?,
                    correct: row.get(5)?,
                    created_at: time_column(row, 6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// Attempts logged since `since` as `(total, correct)`
    pub fn count_attempts_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<(i64, i64)> {
        let counts = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(correct), 0) FROM progress_logs
             WHERE user_id = ?1 AND created_at >= ?2",
            params![user_id.to_string(), time_to_sql(&since)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(counts)
    }

    /// UTC days with at least one logged attempt
    fn active_days(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn().prepare(
            "SELECT DISTINCT substr(created_at, 1, 10) FROM progress_logs WHERE user_id = ?1",
        )?;
        let days = stmt
            .query_map([user_id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(days
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect())
    }

    /// Dashboard statistics as of `at`
    pub fn progress_stats(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<ProgressStats> {
        let conn = self.conn();
        let user = user_id.to_string();

        let total_vocabulary: i64 = conn.query_row(
            "SELECT COUNT(*) FROM vocabulary_items WHERE user_id = ?1",
            [&user],
            |row| row.get(0),
        )?;
        let (learned_count, due_count): (i64, i64) = conn.query_row(
            "SELECT
                COALESCE(SUM(s.repetitions >= ?2 AND s.interval_days >= ?3), 0),
                COALESCE(SUM(s.next_review <= ?4), 0)
             FROM review_schedules s
             JOIN vocabulary_items v ON v.id = s.vocabulary_id
             WHERE v.user_id = ?1",
            params![&user, LEARNED_REPETITIONS, LEARNED_INTERVAL_DAYS, time_to_sql(&at)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let today = at.date_naive();
        let (reviews_today, correct_today) = self.count_attempts_since(user_id, day_start(today))?;
        let (total_attempts, total_correct): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(correct), 0) FROM progress_logs WHERE user_id = ?1",
            [&user],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let accuracy = if total_attempts == 0 {
            0.0
        } else {
            total_correct as f64 / total_attempts as f64
        };

        let sessions_completed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM study_sessions WHERE user_id = ?1 AND status = ?2",
            params![&user, SessionStatus::Complete.as_str()],
            |row| row.get(0),
        )?;

        let days = self.active_days(user_id)?;

        Ok(ProgressStats {
            total_vocabulary,
            learned_count,
            due_count,
            reviews_today,
            correct_today,
            accuracy,
            current_streak: current_streak(&days, today),
            longest_streak: longest_streak(&days),
            sessions_completed,
        })
    }

    /// Per-day activity for the last `days` days ending at `at`, oldest first
    pub fn progress_history(&self, user_id: Uuid, days: i64, at: DateTime<Utc>) -> Result<Vec<DailyProgress>> {
        let today = at.date_naive();
        let first = today - Duration::days(days - 1);

        let mut stmt = self.conn().prepare(
            "SELECT substr(created_at, 1, 10) AS day, COUNT(*), COALESCE(SUM(correct), 0)
             FROM progress_logs
             WHERE user_id = ?1 AND created_at >= ?2
             GROUP BY day",
        )?;
        let rows = stmt
            .query_map(
                params![user_id.to_string(), time_to_sql(&day_start(first))],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let history = (0..days)
            .map(|offset| {
                let date = first + Duration::days(offset);
                let key = date.format("%Y-%m-%d").to_string();
                let (reviews, correct) = rows
                    .iter()
                    .find(|(day, _, _)| *day == key)
                    .map(|(_, reviews, correct)| (*reviews, *correct))
                    .unwrap_or((0, 0));
                DailyProgress {
                    date,
                    reviews,
                    correct,
                }
            })
            .collect();

        Ok(history)
    }
}
