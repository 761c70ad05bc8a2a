use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{double_option, ValidationErrors};

pub const MAX_GROUP_NAME_LEN: usize = 100;
pub const MAX_GROUP_DESCRIPTION_LEN: usize = 500;

/// A named, ordered collection of vocabulary items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group with its members in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: VocabularyGroup,
    pub vocabulary_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CreateGroupRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name, MAX_GROUP_NAME_LEN);
        errors.optional_text(
            "description",
            self.description.as_deref(),
            MAX_GROUP_DESCRIPTION_LEN,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateGroupRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.require_text("name", name, MAX_GROUP_NAME_LEN);
        }
        if let Some(description) = &self.description {
            errors.optional_text("description", description.as_deref(), MAX_GROUP_DESCRIPTION_LEN);
        }
        errors.into_result()
    }
}

/// Body of `PUT /api/groups/{id}/vocabulary`: the full membership after a drag-and-drop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGroupVocabularyRequest {
    pub vocabulary_ids: Vec<Uuid>,
}
