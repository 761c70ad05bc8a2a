//! Opaque pagination cursors
//!
//! A cursor names the last row of the previous page by its sort key
//! `(created_at, id)`, encoded as URL-safe base64 of `"{created_at}|{id}"`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::storage::time_to_sql;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl Cursor {
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { created_at, id }
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}|{}", time_to_sql(&self.created_at), self.id))
    }

    /// `None` for anything that was not produced by [`Cursor::encode`]
    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let (time, id) = text.split_once('|')?;
        let created_at = DateTime::parse_from_rfc3339(time).ok()?.with_timezone(&Utc);
        let id = Uuid::parse_str(id).ok()?;
        Some(Self { created_at, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::now;

    #[test]
    fn test_cursor_decodes_what_it_encodes() {
        let cursor = Cursor::new(now(), Uuid::new_v4());
        assert_eq!(Cursor::decode(&cursor.encode()), Some(cursor));
    }

    #[test]
    fn test_garbage_cursor_rejected() {
        assert_eq!(Cursor::decode("not base64!"), None);
        assert_eq!(Cursor::decode(&URL_SAFE_NO_PAD.encode("no-separator")), None);
        assert_eq!(Cursor::decode(&URL_SAFE_NO_PAD.encode("2024-01-01|nope")), None);
    }
}
