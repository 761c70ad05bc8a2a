//! Example sentence persistence

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::storage::{now, time_column, time_to_sql, uuid_column, Database, Result, StorageError};
use crate::validation::clean_optional;
use crate::vocabulary::storage::ensure_vocabulary_owned;

const SENTENCE_COLUMNS: &str =
    "id, vocabulary_id, sentence, translation, created_at, updated_at";

fn sentence_from_row(row: &Row<'_>) -> rusqlite::Result<ExampleSentence> {
    Ok(ExampleSentence {
        id: uuid_column(row, 0)?,
        vocabulary_id: uuid_column(row, 1)?,
        sentence: row.get(2)?,
        translation: row.get(3)?,
        created_at: time_column(row, 4)?,
        updated_at: time_column(row, 5)?,
    })
}

/// Insert without ownership checks; callers have already verified the item
pub(crate) fn insert_sentence(
    conn: &Connection,
    vocabulary_id: Uuid,
    request: CreateSentenceRequest,
) -> Result<ExampleSentence> {
    request.validate()?;

    let created = now();
    let sentence = ExampleSentence {
        id: Uuid::new_v4(),
        vocabulary_id,
        sentence: request.sentence.trim().to_string(),
        translation: clean_optional(request.translation),
        created_at: created,
        updated_at: created,
    };

    conn.execute(
        "INSERT INTO example_sentences (id, vocabulary_id, sentence, translation, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            sentence.id.to_string(),
            sentence.vocabulary_id.to_string(),
            sentence.sentence,
            sentence.translation,
            time_to_sql(&sentence.created_at),
            time_to_sql(&sentence.updated_at),
        ],
    )?;

    Ok(sentence)
}

pub(crate) fn sentences_for(conn: &Connection, vocabulary_id: Uuid) -> Result<Vec<ExampleSentence>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM example_sentences WHERE vocabulary_id = ?1 ORDER BY created_at, id",
        SENTENCE_COLUMNS
    ))?;
    let sentences = stmt
        .query_map([vocabulary_id.to_string()], sentence_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sentences)
}

fn find_sentence(conn: &Connection, vocabulary_id: Uuid, sentence_id: Uuid) -> Result<ExampleSentence> {
    conn.query_row(
        &format!(
            "SELECT {} FROM example_sentences WHERE id = ?1 AND vocabulary_id = ?2",
            SENTENCE_COLUMNS
        ),
        params![sentence_id.to_string(), vocabulary_id.to_string()],
        sentence_from_row,
    )
    .optional()?
    .ok_or_else(|| StorageError::NotFound(format!("Sentence {} not found", sentence_id)))
}

impl Database {
    pub fn list_sentences(&self, user_id: Uuid, vocabulary_id: Uuid) -> Result<Vec<ExampleSentence>> {
        ensure_vocabulary_owned(self.conn(), user_id, vocabulary_id)?;
        sentences_for(self.conn(), vocabulary_id)
    }

    pub fn create_sentence(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
        request: CreateSentenceRequest,
    ) -> Result<ExampleSentence> {
        ensure_vocabulary_owned(self.conn(), user_id, vocabulary_id)?;
        insert_sentence(self.conn(), vocabulary_id, request)
    }

    /// Apply only the fields present in `updates`
    pub fn update_sentence(
        &self,
        user_id: Uuid,
        vocabulary_id: Uuid,
        sentence_id: Uuid,
        updates: UpdateSentenceRequest,
    ) -> Result<ExampleSentence> {
        updates.validate()?;
        ensure_vocabulary_owned(self.conn(), user_id, vocabulary_id)?;
        let mut sentence = find_sentence(self.conn(), vocabulary_id, sentence_id)?;

        if let Some(text) = updates.sentence {
            sentence.sentence = text.trim().to_string();
        }
        if let Some(translation) = updates.translation {
            sentence.translation = clean_optional(translation);
        }
        sentence.updated_at = now();

        self.conn().execute(
            "UPDATE example_sentences SET sentence = ?2, translation = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                sentence.id.to_string(),
                sentence.sentence,
                sentence.translation,
                time_to_sql(&sentence.updated_at),
            ],
        )?;

        Ok(sentence)
    }

    pub fn delete_sentence(&self, user_id: Uuid, vocabulary_id: Uuid, sentence_id: Uuid) -> Result<()> {
        ensure_vocabulary_owned(self.conn(), user_id, vocabulary_id)?;
        let removed = self.conn().execute(
            "DELETE FROM example_sentences WHERE id = ?1 AND vocabulary_id = ?2",
            params![sentence_id.to_string(), vocabulary_id.to_string()],
        )?;
        if removed == 0 {
            return Err(StorageError::NotFound(format!("Sentence {} not found", sentence_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CreateVocabularyRequest;

    fn setup() -> (Database, Uuid, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user("sentences@example.com", None).unwrap();
        let item = db
            .create_vocabulary(user.id, CreateVocabularyRequest::new("食べる", "たべる", "to eat"))
            .unwrap();
        (db, user.id, item.id)
    }

    fn request(sentence: &str, translation: Option<&str>) -> CreateSentenceRequest {
        CreateSentenceRequest {
            sentence: sentence.to_string(),
            translation: translation.map(String::from),
        }
    }

    #[test]
    fn test_create_then_list() {
        let (db, user_id, vocab_id) = setup();
        let created = db
            .create_sentence(user_id, vocab_id, request("りんごを食べる。", Some("I eat an apple.")))
            .unwrap();

        let listed = db.list_sentences(user_id, vocab_id).unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let (db, user_id, vocab_id) = setup();
        let created = db
            .create_sentence(user_id, vocab_id, request("パンを食べる。", Some("I eat bread.")))
            .unwrap();

        let updated = db
            .update_sentence(
                user_id,
                vocab_id,
                created.id,
                UpdateSentenceRequest {
                    sentence: Some("ご飯を食べる。".into()),
                    translation: None,
                },
            )
            .unwrap();
        assert_eq!(updated.sentence, "ご飯を食べる。");
        assert_eq!(updated.translation.as_deref(), Some("I eat bread."));

        let cleared = db
            .update_sentence(
                user_id,
                vocab_id,
                created.id,
                UpdateSentenceRequest {
                    sentence: None,
                    translation: Some(None),
                },
            )
            .unwrap();
        assert!(cleared.translation.is_none());
    }

    #[test]
    fn test_delete_and_missing() {
        let (db, user_id, vocab_id) = setup();
        let created = db
            .create_sentence(user_id, vocab_id, request("魚を食べる。", None))
            .unwrap();

        db.delete_sentence(user_id, vocab_id, created.id).unwrap();
        assert!(db.list_sentences(user_id, vocab_id).unwrap().is_empty());
        assert!(matches!(
            db.delete_sentence(user_id, vocab_id, created.id),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_sentence_of_other_item_is_not_found() {
        let (db, user_id, vocab_id) = setup();
        let other = db
            .create_vocabulary(user_id, CreateVocabularyRequest::new("飲む", "のむ", "to drink"))
            .unwrap();
        let created = db
            .create_sentence(user_id, vocab_id, request("水を飲む。", None))
            .unwrap();

        let err = db
            .update_sentence(user_id, other.id, created.id, UpdateSentenceRequest::default())
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_blank_sentence_rejected() {
        let (db, user_id, vocab_id) = setup();
        let err = db
            .create_sentence(user_id, vocab_id, request("  ", None))
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_other_users_item_is_not_found() {
        let (db, _, vocab_id) = setup();
        let intruder = db.create_user("intruder@example.com", None).unwrap();
        assert!(matches!(
            db.list_sentences(intruder.id, vocab_id),
            Err(StorageError::NotFound(_))
        ));
    }
}
