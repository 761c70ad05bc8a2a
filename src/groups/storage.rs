//! Group persistence and membership ordering

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::storage::{
    is_unique_violation, now, time_column, time_to_sql, uuid_column, Database, Result,
    StorageError,
};
use crate::validation::{clean_optional, ValidationErrors};

const GROUP_COLUMNS: &str = "g.id, g.user_id, g.name, g.description, \
     (SELECT COUNT(*) FROM group_members m WHERE m.group_id = g.id), g.created_at, g.updated_at";

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<VocabularyGroup> {
    Ok(VocabularyGroup {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        item_count: row.get(4)?,
        created_at: time_column(row, 5)?,
        updated_at: time_column(row, 6)?,
    })
}

fn not_found(id: Uuid) -> StorageError {
    StorageError::NotFound(format!("Group {} not found", id))
}

fn duplicate_name(err: rusqlite::Error, name: &str) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::Conflict(format!("A group named '{}' already exists", name))
    } else {
        err.into()
    }
}

fn find_group(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<VocabularyGroup> {
    conn.query_row(
        &format!(
            "SELECT {} FROM vocabulary_groups g WHERE g.id = ?1 AND g.user_id = ?2",
            GROUP_COLUMNS
        ),
        params![id.to_string(), user_id.to_string()],
        group_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

/// Fail with `NotFound` unless `user_id` owns the group
pub(crate) fn ensure_group_owned(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<()> {
    conn.query_row(
        "SELECT 1 FROM vocabulary_groups WHERE id = ?1 AND user_id = ?2",
        params![id.to_string(), user_id.to_string()],
        |_| Ok(()),
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

/// Add an item at the end of a group; no-op when already a member
pub(crate) fn append_member(conn: &Connection, group_id: Uuid, vocabulary_id: Uuid) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO group_members (group_id, vocabulary_id, position)
         VALUES (?1, ?2, (SELECT COALESCE(MAX(position) + 1, 0) FROM group_members WHERE group_id = ?1))",
        params![group_id.to_string(), vocabulary_id.to_string()],
    )?;
    Ok(inserted > 0)
}

pub(crate) fn group_ids_for(conn: &Connection, vocabulary_id: Uuid) -> Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(
        "SELECT m.group_id FROM group_members m
         JOIN vocabulary_groups g ON g.id = m.group_id
         WHERE m.vocabulary_id = ?1 ORDER BY g.name",
    )?;
    let ids = stmt
        .query_map([vocabulary_id.to_string()], |row| uuid_column(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

fn member_ids(conn: &Connection, group_id: Uuid) -> Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(
        "SELECT vocabulary_id FROM group_members WHERE group_id = ?1 ORDER BY position",
    )?;
    let ids = stmt
        .query_map([group_id.to_string()], |row| uuid_column(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

fn touch_group(conn: &Connection, group_id: Uuid) -> Result<()> {
    conn.execute(
        "UPDATE vocabulary_groups SET updated_at = ?2 WHERE id = ?1",
        params![group_id.to_string(), time_to_sql(&now())],
    )?;
    Ok(())
}

impl Database {
    /// All groups of a user, alphabetically
    pub fn list_groups(&self, user_id: Uuid) -> Result<Vec<VocabularyGroup>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM vocabulary_groups g WHERE g.user_id = ?1 ORDER BY g.name COLLATE NOCASE",
            GROUP_COLUMNS
        ))?;
        let groups = stmt
            .query_map([user_id.to_string()], group_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    pub fn get_group(&self, user_id: Uuid, id: Uuid) -> Result<GroupDetail> {
        let group = find_group(self.conn(), user_id, id)?;
        Ok(GroupDetail {
            vocabulary_ids: member_ids(self.conn(), id)?,
            group,
        })
    }

    pub fn create_group(&self, user_id: Uuid, request: CreateGroupRequest) -> Result<VocabularyGroup> {
        request.validate()?;

        let created = now();
        let group = VocabularyGroup {
            id: Uuid::new_v4(),
            user_id,
            name: request.name.trim().to_string(),
            description: clean_optional(request.description),
            item_count: 0,
            created_at: created,
            updated_at: created,
        };

        self.conn()
            .execute(
                "INSERT INTO vocabulary_groups (id, user_id, name, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    group.id.to_string(),
                    group.user_id.to_string(),
                    group.name,
                    group.description,
                    time_to_sql(&group.created_at),
                    time_to_sql(&group.updated_at),
                ],
            )
            .map_err(|e| duplicate_name(e, &group.name))?;

        Ok(group)
    }

    /// Apply only the fields present in `updates`
    pub fn update_group(
        &self,
        user_id: Uuid,
        id: Uuid,
        updates: UpdateGroupRequest,
    ) -> Result<VocabularyGroup> {
        updates.validate()?;
        let mut group = find_group(self.conn(), user_id, id)?;

        if let Some(name) = updates.name {
            group.name = name.trim().to_string();
        }
        if let Some(description) = updates.description {
            group.description = clean_optional(description);
        }
        group.updated_at = now();

        self.conn()
            .execute(
                "UPDATE vocabulary_groups SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    group.id.to_string(),
                    group.name,
                    group.description,
                    time_to_sql(&group.updated_at),
                ],
            )
            .map_err(|e| duplicate_name(e, &group.name))?;

        Ok(group)
    }

    /// Delete a group; its items stay, memberships cascade
    pub fn delete_group(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let removed = self.conn().execute(
            "DELETE FROM vocabulary_groups WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if removed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Replace the membership of a group with `vocabulary_ids`, in that order
    ///
    /// Repeated ids keep their first position. Ids the user does not own are
    /// rejected as a whole, leaving the group untouched.
    pub fn set_group_vocabulary(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        vocabulary_ids: &[Uuid],
    ) -> Result<GroupDetail> {
        self.transaction(|tx| {
            ensure_group_owned(tx, user_id, group_id)?;

            let mut seen = HashSet::new();
            let ordered: Vec<Uuid> = vocabulary_ids
                .iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .collect();

            let mut owned = tx.prepare_cached(
                "SELECT 1 FROM vocabulary_items WHERE id = ?1 AND user_id = ?2",
            )?;
            let mut unknown = Vec::new();
            for id in &ordered {
                if !owned.exists(params![id.to_string(), user_id.to_string()])? {
                    unknown.push(id.to_string());
                }
            }
            if !unknown.is_empty() {
                return Err(ValidationErrors::single(
                    "vocabularyIds",
                    format!("unknown vocabulary ids: {}", unknown.join(", ")),
                )
                .into());
            }

            tx.execute(
                "DELETE FROM group_members WHERE group_id = ?1",
                [group_id.to_string()],
            )?;
            let mut insert = tx.prepare_cached(
                "INSERT INTO group_members (group_id, vocabulary_id, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, id) in ordered.iter().enumerate() {
                insert.execute(params![group_id.to_string(), id.to_string(), position as i64])?;
            }
            touch_group(tx, group_id)?;

            log::debug!("Group {} now has {} items", group_id, ordered.len());
            Ok(GroupDetail {
                group: find_group(tx, user_id, group_id)?,
                vocabulary_ids: ordered,
            })
        })
    }

    /// Drag a single item into a group; adding an existing member changes nothing
    pub fn add_to_group(&self, user_id: Uuid, group_id: Uuid, vocabulary_id: Uuid) -> Result<GroupDetail> {
        self.transaction(|tx| {
            ensure_group_owned(tx, user_id, group_id)?;
            crate::vocabulary::storage::ensure_vocabulary_owned(tx, user_id, vocabulary_id)?;
            if append_member(tx, group_id, vocabulary_id)? {
                touch_group(tx, group_id)?;
            }
            Ok(())
        })?;
        self.get_group(user_id, group_id)
    }

    /// Drag a single item out of a group
    pub fn remove_from_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        vocabulary_id: Uuid,
    ) -> Result<GroupDetail> {
        ensure_group_owned(self.conn(), user_id, group_id)?;
        let removed = self.conn().execute(
            "DELETE FROM group_members WHERE group_id = ?1 AND vocabulary_id = ?2",
            params![group_id.to_string(), vocabulary_id.to_string()],
        )?;
        if removed == 0 {
            return Err(StorageError::NotFound(format!(
                "Vocabulary {} is not in group {}",
                vocabulary_id, group_id
            )));
        }
        touch_group(self.conn(), group_id)?;
        self.get_group(user_id, group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CreateVocabularyRequest;

    fn setup() -> (Database, Uuid, Vec<Uuid>) {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user("groups@example.com", None).unwrap();
        let ids = [("一", "いち", "one"), ("二", "に", "two"), ("三", "さん", "three")]
            .iter()
            .map(|(w, r, m)| {
                db.create_vocabulary(user.id, CreateVocabularyRequest::new(w, r, m))
                    .unwrap()
                    .id
            })
            .collect();
        (db, user.id, ids)
    }

    #[test]
    fn test_create_list_update_delete() {
        let (db, user_id, _) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Numbers"))
            .unwrap();
        assert_eq!(db.list_groups(user_id).unwrap(), vec![group.clone()]);

        let updated = db
            .update_group(
                user_id,
                group.id,
                UpdateGroupRequest {
                    name: None,
                    description: Some(Some("Counting".into())),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Numbers");
        assert_eq!(updated.description.as_deref(), Some("Counting"));

        db.delete_group(user_id, group.id).unwrap();
        assert!(db.list_groups(user_id).unwrap().is_empty());
        assert!(matches!(
            db.delete_group(user_id, group.id),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_name_conflicts() {
        let (db, user_id, _) = setup();
        db.create_group(user_id, CreateGroupRequest::new("Verbs")).unwrap();
        assert!(matches!(
            db.create_group(user_id, CreateGroupRequest::new("Verbs")),
            Err(StorageError::Conflict(_))
        ));
    }

    #[test]
    fn test_set_group_vocabulary_replaces_in_order() {
        let (db, user_id, ids) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Numbers"))
            .unwrap();

        let detail = db
            .set_group_vocabulary(user_id, group.id, &[ids[2], ids[0], ids[2]])
            .unwrap();
        assert_eq!(detail.vocabulary_ids, vec![ids[2], ids[0]]);
        assert_eq!(detail.group.item_count, 2);

        let detail = db.set_group_vocabulary(user_id, group.id, &[ids[1]]).unwrap();
        assert_eq!(detail.vocabulary_ids, vec![ids[1]]);
        assert_eq!(db.get_group(user_id, group.id).unwrap().vocabulary_ids, vec![ids[1]]);
    }

    #[test]
    fn test_set_group_vocabulary_rejects_foreign_ids() {
        let (db, user_id, ids) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Numbers"))
            .unwrap();
        db.set_group_vocabulary(user_id, group.id, &[ids[0]]).unwrap();

        let stranger = Uuid::new_v4();
        let err = db
            .set_group_vocabulary(user_id, group.id, &[ids[1], stranger])
            .unwrap_err();
        match err {
            StorageError::Validation(errors) => {
                assert_eq!(errors.fields[0].field, "vocabularyIds");
                assert!(errors.fields[0].message.contains(&stranger.to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Untouched after the failed replace
        assert_eq!(db.get_group(user_id, group.id).unwrap().vocabulary_ids, vec![ids[0]]);
    }

    #[test]
    fn test_add_and_remove_single_item() {
        let (db, user_id, ids) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Numbers"))
            .unwrap();

        db.add_to_group(user_id, group.id, ids[0]).unwrap();
        db.add_to_group(user_id, group.id, ids[1]).unwrap();
        let detail = db.add_to_group(user_id, group.id, ids[0]).unwrap();
        assert_eq!(detail.vocabulary_ids, vec![ids[0], ids[1]]);

        let detail = db.remove_from_group(user_id, group.id, ids[0]).unwrap();
        assert_eq!(detail.vocabulary_ids, vec![ids[1]]);
        assert!(matches!(
            db.remove_from_group(user_id, group.id, ids[0]),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_deleting_group_keeps_items() {
        let (db, user_id, ids) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Numbers"))
            .unwrap();
        db.set_group_vocabulary(user_id, group.id, &ids).unwrap();
        db.delete_group(user_id, group.id).unwrap();

        assert_eq!(db.all_vocabulary(user_id, None).unwrap().len(), 3);
        assert!(db.get_vocabulary(user_id, ids[0]).unwrap().group_ids.is_empty());
    }

    #[test]
    fn test_other_users_group_not_found() {
        let (db, user_id, _) = setup();
        let group = db
            .create_group(user_id, CreateGroupRequest::new("Mine"))
            .unwrap();
        let other = db.create_user("other@example.com", None).unwrap();
        assert!(matches!(
            db.get_group(other.id, group.id),
            Err(StorageError::NotFound(_))
        ));
    }
}
