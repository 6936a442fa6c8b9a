//! Entity resolution contracts.
//!
//! # Responsibility
//! - Define the seam through which the projector resolves file, user and
//!   content references owned by the hosting system.
//!
//! # Invariants
//! - Resolution is synchronous and never retried; callers treat failures
//!   as "not found".
//! - `load_content` preserves the order of the requested ids.

use crate::db::DbError;
use crate::model::roster::EntityId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite_lookup;

pub use sqlite_lookup::SqliteEntityLookup;

pub type LookupResult<T> = Result<T, LookupError>;

/// Error for entity resolution transport and decoding.
#[derive(Debug)]
pub enum LookupError {
    Db(DbError),
    InvalidData(String),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted entity data: {message}")
            }
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for LookupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LookupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A managed file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntity {
    pub id: EntityId,
    /// Storage URI, either scheme-prefixed (`public://...`) or absolute.
    pub uri: String,
}

impl FileEntity {
    /// Returns the public URL for this file.
    ///
    /// The managed `public://` scheme maps to the `/files/` web root;
    /// anything else is already addressable and passes through.
    pub fn to_url(&self) -> String {
        match self.uri.strip_prefix("public://") {
            Some(rest) => format!("/files/{rest}"),
            None => self.uri.clone(),
        }
    }
}

/// A user account with optional free-form profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    pub id: EntityId,
    pub account_name: String,
    /// Profile fields by name, e.g. `description` for the bio line.
    pub fields: BTreeMap<String, String>,
}

impl UserEntity {
    /// Returns whether the account carries the named profile field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the named profile field value, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A content item authored by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: EntityId,
    /// Content bundle, e.g. `article`.
    pub kind: String,
    pub title: String,
    pub summary: String,
    pub author: EntityId,
    pub published: bool,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Filter options for content queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub kind: String,
    pub published: bool,
    pub author: EntityId,
    /// Maximum ids to return, newest first.
    pub limit: u32,
}

/// Resolution seam over the hosting system's entity storage.
pub trait EntityLookup {
    /// Resolves a managed file reference.
    fn load_file(&self, id: EntityId) -> LookupResult<Option<FileEntity>>;

    /// Resolves a user account reference.
    fn load_user(&self, id: EntityId) -> LookupResult<Option<UserEntity>>;

    /// Returns matching content ids ordered by creation time descending.
    fn query_content(&self, query: &ContentQuery) -> LookupResult<Vec<EntityId>>;

    /// Loads content items, preserving the requested id order and
    /// skipping ids that no longer resolve.
    fn load_content(&self, ids: &[EntityId]) -> LookupResult<Vec<ContentItem>>;
}

#[cfg(test)]
mod tests {
    use super::FileEntity;
    use uuid::Uuid;

    fn file(uri: &str) -> FileEntity {
        FileEntity {
            id: Uuid::new_v4(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn public_scheme_maps_to_files_root() {
        assert_eq!(
            file("public://leaders/alice.png").to_url(),
            "/files/leaders/alice.png"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            file("https://cdn.example.com/a.png").to_url(),
            "https://cdn.example.com/a.png"
        );
    }
}
