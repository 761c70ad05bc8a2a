//! Vocabulary persistence
//!
//! Items are always scoped to their owner: an item belonging to another
//! user is reported as not found.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::cursor::Cursor;
use super::models::*;
use crate::groups::storage::{append_member, ensure_group_owned, group_ids_for};
use crate::progress::storage::insert_log;
use crate::progress::{NewProgressLog, StudyMode};
use crate::sentences::storage::{insert_sentence, sentences_for};
use crate::srs::algorithm::{apply_review, format_interval, PASSING_QUALITY};
use crate::srs::storage::{
    find_schedule, insert_schedule, schedule_from_row, update_schedule, SCHEDULE_COLUMNS,
};
use crate::srs::{ReviewOutcome, ReviewSchedule};
use crate::storage::{now, time_column, time_to_sql, uuid_column, Database, Result, StorageError};
use crate::validation::{clean_optional, ValidationErrors};

pub(crate) const VOCABULARY_COLUMNS: &str = "v.id, v.user_id, v.word, v.reading, v.meaning, \
     v.part_of_speech, v.jlpt_level, v.notes, v.created_at, v.updated_at";

/// Number of columns in `VOCABULARY_COLUMNS`
const VOCABULARY_COLUMN_COUNT: usize = 10;

pub(crate) fn vocabulary_from_row(row: &Row<'_>) -> rusqlite::Result<VocabularyItem> {
    Ok(VocabularyItem {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        word: row.get(2)?,
        reading: row.get(3)?,
        meaning: row.get(4)?,
        part_of_speech: row.get(5)?,
        jlpt_level: row.get(6)?,
        notes: row.get(7)?,
        created_at: time_column(row, 8)?,
        updated_at: time_column(row, 9)?,
    })
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::NotFound(format!("Vocabulary {} not found", id))
}

pub(crate) fn find_vocabulary(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<VocabularyItem> {
    conn.query_row(
        &format!(
            "SELECT {} FROM vocabulary_items v WHERE v.id = ?1 AND v.user_id = ?2",
            VOCABULARY_COLUMNS
        ),
        params![id.to_string(), user_id.to_string()],
        vocabulary_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

/// Fail with `NotFound` unless `user_id` owns the item
pub(crate) fn ensure_vocabulary_owned(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<()> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM vocabulary_items WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    exists.ok_or_else(|| not_found(id))
}

/// Escape LIKE wildcards so user search text matches literally
fn like_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Database {
    /// Create an item, its review schedule, its sentences and group memberships atomically
    pub fn create_vocabulary(
        &self,
        user_id: Uuid,
        request: CreateVocabularyRequest,
    ) -> Result<VocabularyItem> {
        request.validate()?;

        self.transaction(|tx| {
            for group_id in &request.group_ids {
                ensure_group_owned(tx, user_id, *group_id)?;
            }

            let created = now();
            let item = VocabularyItem {
                id: Uuid::new_v4(),
                user_id,
                word: request.word.trim().to_string(),
                reading: request.reading.trim().to_string(),
                meaning: request.meaning.trim().to_string(),
                part_of_speech: clean_optional(request.part_of_speech),
                jlpt_level: request.jlpt_level,
                notes: clean_optional(request.notes),
                created_at: created,
                updated_at: created,
            };

            tx.execute(
                "INSERT INTO vocabulary_items
                    (id, user_id, word, reading, meaning, part_of_speech, jlpt_level, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    item.id.to_string(),
                    item.user_id.to_string(),
                    item.word,
                    item.reading,
                    item.meaning,
                    item.part_of_speech,
                    item.jlpt_level,
                    item.notes,
                    time_to_sql(&item.created_at),
                    time_to_sql(&item.updated_at),
                ],
            )?;

            insert_schedule(tx, &ReviewSchedule::new(item.id, created))?;

            for sentence in request.sentences {
                insert_sentence(tx, item.id, sentence)?;
            }
            for group_id in &request.group_ids {
                append_member(tx, *group_id, item.id)?;
            }

            log::debug!("Created vocabulary {} for user {}", item.id, user_id);
            Ok(item)
        })
    }

    /// Item with schedule, sentences and group ids
    pub fn get_vocabulary(&self, user_id: Uuid, id: Uuid) -> Result<VocabularyDetail> {
        let conn = self.conn();
        let item = find_vocabulary(conn, user_id, id)?;
        let schedule = match find_schedule(conn, id)? {
            Some(schedule) => schedule,
            None => {
                // Rows created outside the API may lack a schedule
                let schedule = ReviewSchedule::new(id, item.created_at);
                insert_schedule(conn, &schedule)?;
                schedule
            }
        };

        Ok(VocabularyDetail {
            schedule,
            sentences: sentences_for(conn, id)?,
            group_ids: group_ids_for(conn, id)?,
            item,
        })
    }

    /// One page of items, newest first
    ///
    /// `limit` must already be clamped by the caller. A malformed cursor is a
    /// validation error on the `cursor` field.
    pub fn list_vocabulary(
        &self,
        user_id: Uuid,
        query: &VocabularyQuery,
        limit: usize,
    ) -> Result<VocabularyPage> {
        let cursor = match query.cursor.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => Some(Cursor::decode(raw).ok_or_else(|| {
                ValidationErrors::single("cursor", "is not a valid pagination cursor")
            })?),
            None => None,
        };
        if let Some(group_id) = query.group_id {
            ensure_group_owned(self.conn(), user_id, group_id)?;
        }

        let mut sql = format!(
            "SELECT {} FROM vocabulary_items v WHERE v.user_id = ?",
            VOCABULARY_COLUMNS
        );
        let mut values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(cursor) = &cursor {
            let time = time_to_sql(&cursor.created_at);
            sql.push_str(" AND (v.created_at < ? OR (v.created_at = ? AND v.id < ?))");
            values.push(Value::Text(time.clone()));
            values.push(Value::Text(time));
            values.push(Value::Text(cursor.id.to_string()));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(
                r" AND (unicode_lower(v.word) LIKE ? ESCAPE '\' OR unicode_lower(v.reading) LIKE ? ESCAPE '\' OR unicode_lower(v.meaning) LIKE ? ESCAPE '\')",
            );
            let pattern = like_pattern(search);
            for _ in 0..3 {
                values.push(Value::Text(pattern.clone()));
            }
        }
        if let Some(group_id) = query.group_id {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM group_members m WHERE m.group_id = ? AND m.vocabulary_id = v.id)",
            );
            values.push(Value::Text(group_id.to_string()));
        }
        sql.push_str(" ORDER BY v.created_at DESC, v.id DESC LIMIT ?");
        // One extra row tells us whether another page exists
        values.push(Value::Integer(limit as i64 + 1));

        let mut stmt = self.conn().prepare(&sql)?;
        let mut items = stmt
            .query_map(params_from_iter(values), vocabulary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let has_more = items.len() > limit;
        items.truncate(limit);
        let next_cursor = if has_more {
            items
                .last()
                .map(|last| Cursor::new(last.created_at, last.id).encode())
        } else {
            None
        };

        Ok(VocabularyPage {
            items,
            next_cursor,
            has_more,
        })
    }

    /// Every item of the user (or of one group), used to build quizzes
    pub fn all_vocabulary(&self, user_id: Uuid, group_id: Option<Uuid>) -> Result<Vec<VocabularyItem>> {
        let conn = self.conn();
        let items = match group_id {
            Some(group_id) => {
                ensure_group_owned(conn, user_id, group_id)?;
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM vocabulary_items v
                     JOIN group_members m ON m.vocabulary_id = v.id
                     WHERE m.group_id = ?1 ORDER BY m.position",
                    VOCABULARY_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([group_id.to_string()], vocabulary_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM vocabulary_items v WHERE v.user_id = ?1 ORDER BY v.created_at, v.id",
                    VOCABULARY_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([user_id.to_string()], vocabulary_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };
        Ok(items)
    }

    /// Apply only the fields present in `updates`
    pub fn update_vocabulary(
        &self,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateVocabularyRequest,
    ) -> Result<VocabularyItem> {
        updates.validate()?;
        let mut item = find_vocabulary(self.conn(), user_id, id)?;

        if let Some(word) = updates.word {
            item.word = word.trim().to_string();
        }
        if let Some(reading) = updates.reading {
            item.reading = reading.trim().to_string();
        }
        if let Some(meaning) = updates.meaning {
            item.meaning = meaning.trim().to_string();
        }
        if let Some(pos) = updates.part_of_speech {
            item.part_of_speech = clean_optional(pos);
        }
        if let Some(level) = updates.jlpt_level {
            item.jlpt_level = level;
        }
        if let Some(notes) = updates.notes {
            item.notes = clean_optional(notes);
        }
        item.updated_at = now();

        self.conn().execute(
            "UPDATE vocabulary_items
             SET word = ?2, reading = ?3, meaning = ?4, part_of_speech = ?5,
                 jlpt_level = ?6, notes = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                item.id.to_string(),
                item.word,
                item.reading,
                item.meaning,
                item.part_of_speech,
                item.jlpt_level,
                item.notes,
                time_to_sql(&item.updated_at),
            ],
        )?;

        Ok(item)
    }

    /// Delete an item; schedule, sentences and memberships cascade
    pub fn delete_vocabulary(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let removed = self.conn().execute(
            "DELETE FROM vocabulary_items WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if removed == 0 {
            return Err(not_found(id));
        }
        log::debug!("Deleted vocabulary {}", id);
        Ok(())
    }

    /// Items whose next review is at or before `at`, most overdue first
    pub fn due_vocabulary(&self, user_id: Uuid, limit: usize, at: DateTime<Utc>) -> Result<DueVocabulary> {
        let conn = self.conn();
        let at = time_to_sql(&at);

        let total_due: i64 = conn.query_row(
            "SELECT COUNT(*) FROM review_schedules s
             JOIN vocabulary_items v ON v.id = s.vocabulary_id
             WHERE v.user_id = ?1 AND s.next_review <= ?2",
            params![user_id.to_string(), at],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {}, {} FROM vocabulary_items v
             JOIN review_schedules s ON s.vocabulary_id = v.id
             WHERE v.user_id = ?1 AND s.next_review <= ?2
             ORDER BY s.next_review ASC, v.id ASC
             LIMIT ?3",
            VOCABULARY_COLUMNS, SCHEDULE_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![user_id.to_string(), at, limit as i64], |row| {
                Ok(ScheduledVocabulary {
                    item: vocabulary_from_row(row)?,
                    schedule: schedule_from_row(row, VOCABULARY_COLUMN_COUNT)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(DueVocabulary { items, total_due })
    }

    /// Record a review: reschedule with SM-2 and log the attempt
    pub fn review_vocabulary(&self, user_id: Uuid, id: Uuid, quality: i32) -> Result<ReviewOutcome> {
        let mut errors = ValidationErrors::new();
        errors.in_range("quality", quality, 0, 5);
        errors.into_result()?;

        self.transaction(|tx| {
            let item = find_vocabulary(tx, user_id, id)?;
            let existing = find_schedule(tx, id)?;
            let current = existing
                .clone()
                .unwrap_or_else(|| ReviewSchedule::new(id, item.created_at));

            let schedule = apply_review(&current, quality, now());
            if existing.is_some() {
                update_schedule(tx, &schedule)?;
            } else {
                insert_schedule(tx, &schedule)?;
            }

            let correct = quality >= PASSING_QUALITY;
            insert_log(
                tx,
                NewProgressLog {
                    user_id,
                    vocabulary_id: Some(id),
                    session_id: None,
                    activity: StudyMode::Review,
                    correct,
                },
            )?;

            Ok(ReviewOutcome {
                next_interval: format_interval(schedule.interval),
                schedule,
                correct,
            })
        })
    }

    /// Items created since `since`, used for the new-words goal
    pub fn count_vocabulary_created_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM vocabulary_items WHERE user_id = ?1 AND created_at >= ?2",
            params![user_id.to_string(), time_to_sql(&since)],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
