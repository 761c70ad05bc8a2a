//! Data models for vocabulary items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sentences::{CreateSentenceRequest, ExampleSentence};
use crate::srs::ReviewSchedule;
use crate::validation::{double_option, ValidationErrors};

pub const MAX_TERM_LEN: usize = 200;
pub const MAX_NOTES_LEN: usize = 2000;

/// A word the user is learning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Written form, e.g. "猫"
    pub word: String,
    /// Kana reading, e.g. "ねこ"
    pub reading: String,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    /// JLPT level 1 (hardest) to 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jlpt_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item with everything hanging off it, returned by the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyDetail {
    #[serde(flatten)]
    pub item: VocabularyItem,
    pub schedule: ReviewSchedule,
    pub sentences: Vec<ExampleSentence>,
    pub group_ids: Vec<Uuid>,
}

/// Item together with its review schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVocabulary {
    #[serde(flatten)]
    pub item: VocabularyItem,
    pub schedule: ReviewSchedule,
}

/// One page of the infinite-scroll list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyPage {
    pub items: Vec<VocabularyItem>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueVocabulary {
    pub items: Vec<ScheduledVocabulary>,
    /// All due items, not just the returned page
    pub total_due: i64,
}

/// Query string of `GET /api/vocabulary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyQuery {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVocabularyRequest {
    pub word: String,
    pub reading: String,
    pub meaning: String,
    pub part_of_speech: Option<String>,
    pub jlpt_level: Option<i64>,
    pub notes: Option<String>,
    /// Groups to add the new item to
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
    /// Example sentences created with the item
    #[serde(default)]
    pub sentences: Vec<CreateSentenceRequest>,
}

impl CreateVocabularyRequest {
    pub fn new(word: &str, reading: &str, meaning: &str) -> Self {
        Self {
            word: word.to_string(),
            reading: reading.to_string(),
            meaning: meaning.to_string(),
            part_of_speech: None,
            jlpt_level: None,
            notes: None,
            group_ids: Vec::new(),
            sentences: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("word", &self.word, MAX_TERM_LEN);
        errors.require_text("reading", &self.reading, MAX_TERM_LEN);
        errors.require_text("meaning", &self.meaning, MAX_TERM_LEN);
        errors.optional_text("partOfSpeech", self.part_of_speech.as_deref(), MAX_TERM_LEN);
        errors.optional_text("notes", self.notes.as_deref(), MAX_NOTES_LEN);
        if let Some(level) = self.jlpt_level {
            errors.in_range("jlptLevel", level, 1, 5);
        }
        for (i, sentence) in self.sentences.iter().enumerate() {
            if let Err(nested) = sentence.validate() {
                for field in nested.fields {
                    errors.add(&format!("sentences[{}].{}", i, field.field), field.message);
                }
            }
        }
        errors.into_result()
    }
}

/// Partial update; absent fields are left untouched, `null` clears optional ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVocabularyRequest {
    pub word: Option<String>,
    pub reading: Option<String>,
    pub meaning: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub part_of_speech: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub jlpt_level: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateVocabularyRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(word) = &self.word {
            errors.require_text("word", word, MAX_TERM_LEN);
        }
        if let Some(reading) = &self.reading {
            errors.require_text("reading", reading, MAX_TERM_LEN);
        }
        if let Some(meaning) = &self.meaning {
            errors.require_text("meaning", meaning, MAX_TERM_LEN);
        }
        if let Some(pos) = &self.part_of_speech {
            errors.optional_text("partOfSpeech", pos.as_deref(), MAX_TERM_LEN);
        }
        if let Some(notes) = &self.notes {
            errors.optional_text("notes", notes.as_deref(), MAX_NOTES_LEN);
        }
        if let Some(Some(level)) = self.jlpt_level {
            errors.in_range("jlptLevel", level, 1, 5);
        }
        errors.into_result()
    }
}
