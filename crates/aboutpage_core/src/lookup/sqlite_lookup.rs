//! SQLite-backed entity lookup.
//!
//! # Responsibility
//! - Resolve file, user and content references from the entity tables.
//!
//! # Invariants
//! - Content queries are ordered by `created_at DESC, uuid ASC` for
//!   deterministic results.
//! - Invalid persisted rows are rejected, not masked.

use crate::db::ensure_tables;
use crate::lookup::{
    ContentItem, ContentQuery, EntityLookup, FileEntity, LookupError, LookupResult, UserEntity,
};
use crate::model::roster::EntityId;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Reference `EntityLookup` implementation over a migrated connection.
pub struct SqliteEntityLookup<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityLookup<'conn> {
    /// Constructs a lookup from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> LookupResult<Self> {
        ensure_tables(conn, &["files", "users", "user_fields", "content_items"])?;
        Ok(Self { conn })
    }
}

impl EntityLookup for SqliteEntityLookup<'_> {
    fn load_file(&self, id: EntityId) -> LookupResult<Option<FileEntity>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uri FROM files WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(FileEntity {
                id,
                uri: row.get(0)?,
            }));
        }

        Ok(None)
    }

    fn load_user(&self, id: EntityId) -> LookupResult<Option<UserEntity>> {
        let mut stmt = self
            .conn
            .prepare("SELECT account_name FROM users WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;

        let account_name: String = match rows.next()? {
            Some(row) => row.get(0)?,
            None => return Ok(None),
        };

        let mut fields = BTreeMap::new();
        let mut field_stmt = self
            .conn
            .prepare("SELECT name, value FROM user_fields WHERE user_uuid = ?1;")?;
        let mut field_rows = field_stmt.query([id.to_string()])?;
        while let Some(row) = field_rows.next()? {
            fields.insert(row.get(0)?, row.get(1)?);
        }

        Ok(Some(UserEntity {
            id,
            account_name,
            fields,
        }))
    }

    fn query_content(&self, query: &ContentQuery) -> LookupResult<Vec<EntityId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM content_items
             WHERE kind = ?1
               AND published = ?2
               AND author_uuid = ?3
             ORDER BY created_at DESC, uuid ASC
             LIMIT ?4;",
        )?;
        let mut rows = stmt.query(params![
            query.kind.as_str(),
            i64::from(query.published),
            query.author.to_string(),
            i64::from(query.limit),
        ])?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            ids.push(parse_uuid(&uuid_text, "content_items.uuid")?);
        }

        Ok(ids)
    }

    fn load_content(&self, ids: &[EntityId]) -> LookupResult<Vec<ContentItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, kind, title, summary, author_uuid, published, created_at
             FROM content_items
             WHERE uuid = ?1;",
        )?;

        let mut items = Vec::new();
        for id in ids {
            let mut rows = stmt.query([id.to_string()])?;
            if let Some(row) = rows.next()? {
                items.push(parse_content_row(row)?);
            }
        }

        Ok(items)
    }
}

fn parse_content_row(row: &Row<'_>) -> LookupResult<ContentItem> {
    let uuid_text: String = row.get("uuid")?;
    let author_text: String = row.get("author_uuid")?;

    let published = match row.get::<_, i64>("published")? {
        0 => false,
        1 => true,
        other => {
            return Err(LookupError::InvalidData(format!(
                "invalid published value `{other}` in content_items.published"
            )));
        }
    };

    Ok(ContentItem {
        id: parse_uuid(&uuid_text, "content_items.uuid")?,
        kind: row.get("kind")?,
        title: row.get("title")?,
        summary: row.get("summary")?,
        author: parse_uuid(&author_text, "content_items.author_uuid")?,
        published,
        created_at: row.get("created_at")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> LookupResult<EntityId> {
    Uuid::parse_str(value)
        .map_err(|_| LookupError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
