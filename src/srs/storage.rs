//! Review schedule persistence

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::ReviewSchedule;
use crate::storage::{opt_time_column, time_column, time_to_sql, uuid_column, Result};

pub(crate) const SCHEDULE_COLUMNS: &str =
    "s.vocabulary_id, s.easiness_factor, s.interval_days, s.repetitions, s.next_review, s.last_reviewed";

/// Map a row whose columns start at `offset` with `SCHEDULE_COLUMNS`
pub(crate) fn schedule_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<ReviewSchedule> {
    Ok(ReviewSchedule {
        vocabulary_id: uuid_column(row, offset)?,
        easiness_factor: row.get(offset + 1)?,
        interval: row.get(offset + 2)?,
        repetitions: row.get(offset + 3)?,
        next_review: time_column(row, offset + 4)?,
        last_reviewed: opt_time_column(row, offset + 5)?,
    })
}

pub(crate) fn insert_schedule(conn: &Connection, schedule: &ReviewSchedule) -> Result<()> {
    conn.execute(
        "INSERT INTO review_schedules
            (vocabulary_id, easiness_factor, interval_days, repetitions, next_review, last_reviewed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            schedule.vocabulary_id.to_string(),
            schedule.easiness_factor,
            schedule.interval,
            schedule.repetitions,
            time_to_sql(&schedule.next_review),
            schedule.last_reviewed.as_ref().map(time_to_sql),
        ],
    )?;
    Ok(())
}

pub(crate) fn update_schedule(conn: &Connection, schedule: &ReviewSchedule) -> Result<()> {
    conn.execute(
        "UPDATE review_schedules
         SET easiness_factor = ?2, interval_days = ?3, repetitions = ?4,
             next_review = ?5, last_reviewed = ?6
         WHERE vocabulary_id = ?1",
        params![
            schedule.vocabulary_id.to_string(),
            schedule.easiness_factor,
            schedule.interval,
            schedule.repetitions,
            time_to_sql(&schedule.next_review),
            schedule.last_reviewed.as_ref().map(time_to_sql),
        ],
    )?;
    Ok(())
}

pub(crate) fn find_schedule(conn: &Connection, vocabulary_id: Uuid) -> Result<Option<ReviewSchedule>> {
    let schedule = conn
        .query_row(
            &format!(
                "SELECT {} FROM review_schedules s WHERE s.vocabulary_id = ?1",
                SCHEDULE_COLUMNS
            ),
            [vocabulary_id.to_string()],
            |row| schedule_from_row(row, 0),
        )
        .optional()?;
    Ok(schedule)
}
