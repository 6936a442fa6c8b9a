//! Flat configuration store contract.
//!
//! # Responsibility
//! - Define the key/value persistence seam used by the editor and
//!   projector services.
//! - Define the typed payloads written under roster keys.
//!
//! # Invariants
//! - `set`/`clear` only stage; nothing is persisted until `save`.
//! - `save` commits every staged write as one unit.
//! - A failed `save` keeps staged writes so the caller can retry.

use crate::db::DbError;
use crate::model::roster::EntityId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keys;
mod sqlite_store;

pub use sqlite_store::{SqliteConfigStore, CONFIG_CACHE_TAG};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for configuration persistence and decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted config data: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Typed payload stored under one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    /// Free-form text.
    Text(String),
    /// Signed integer.
    Integer(i64),
    /// Slot index list (`deleted_groups`).
    Indices(Vec<u32>),
    /// Single entity reference (`anchor_reference`).
    Ref(EntityId),
    /// Entity reference list (`Leader_{n}_profile_image` holds zero or one).
    Refs(Vec<EntityId>),
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_indices(&self) -> Option<&[u32]> {
        match self {
            Self::Indices(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<EntityId> {
        match self {
            Self::Ref(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_refs(&self) -> Option<&[EntityId]> {
        match self {
            Self::Refs(values) => Some(values),
            _ => None,
        }
    }
}

/// Key/value persistence seam for the roster configuration.
///
/// `get` sees staged writes layered over committed state, so a caller that
/// sets and then reads within one interaction observes its own pending
/// values. `cache_tag` names the invalidation tag that read-side payloads
/// carry; every successful `save` invalidates caches keyed on it.
pub trait ConfigStore {
    /// Reads one key, staged writes first.
    fn get(&self, key: &str) -> StoreResult<Option<ConfigValue>>;

    /// Stages one value write. Chainable; persisted on `save`.
    fn set(&mut self, key: &str, value: ConfigValue) -> &mut Self;

    /// Stages one key removal. Chainable; persisted on `save`.
    fn clear(&mut self, key: &str) -> &mut Self;

    /// Commits all staged writes as a single unit.
    fn save(&mut self) -> StoreResult<()>;

    /// Names the cache-invalidation tag tied to this configuration.
    fn cache_tag(&self) -> &str;
}
