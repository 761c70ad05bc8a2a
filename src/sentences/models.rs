use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{double_option, ValidationErrors};

pub const MAX_SENTENCE_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSentence {
    pub id: Uuid,
    pub vocabulary_id: Uuid,
    pub sentence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSentenceRequest {
    pub sentence: String,
    pub translation: Option<String>,
}

impl CreateSentenceRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("sentence", &self.sentence, MAX_SENTENCE_LEN);
        errors.optional_text("translation", self.translation.as_deref(), MAX_SENTENCE_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSentenceRequest {
    pub sentence: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub translation: Option<Option<String>>,
}

impl UpdateSentenceRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(sentence) = &self.sentence {
            errors.require_text("sentence", sentence, MAX_SENTENCE_LEN);
        }
        if let Some(translation) = &self.translation {
            errors.optional_text("translation", translation.as_deref(), MAX_SENTENCE_LEN);
        }
        errors.into_result()
    }
}
