//! Request validation shared by every resource
//!
//! Each request type exposes a `validate()` that collects field-level
//! problems into [`ValidationErrors`], which the API reports as a 400 with
//! the individual fields listed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("Validation failed: {}", summarize(.fields))]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Required text: non-blank and at most `max` characters
    pub fn require_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "is required");
        } else {
            self.max_len(field, value, max);
        }
    }

    /// Optional text: at most `max` characters when present
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("must be at most {} characters", max));
        }
    }

    pub fn in_range<T>(&mut self, field: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if value < min || value > max {
            self.add(field, format!("must be between {} and {}", min, max));
        }
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`)
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim optional text and drop it when blank
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_null_and_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.notes, None);

        let null: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(null.notes, Some(None));

        let set: Patch = serde_json::from_str(r#"{"notes":"hi"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_collects_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.require_text("word", "   ", 10);
        errors.require_text("meaning", "abcdefghijk", 10);
        errors.in_range("jlptLevel", 7, 1, 5);
        errors.optional_text("notes", None, 1);

        assert_eq!(errors.fields.len(), 3);
        assert_eq!(errors.fields[0].field, "word");
        assert!(errors.to_string().contains("jlptLevel: must be between 1 and 5"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_max_len_counts_characters() {
        let mut errors = ValidationErrors::new();
        errors.max_len("word", "日本語", 3);
        assert!(errors.is_empty());
    }
}
