//! SQLite-backed configuration store.
//!
//! # Responsibility
//! - Persist JSON-encoded `ConfigValue` payloads under a flat key table.
//! - Commit staged writes atomically and bump the revision counter that
//!   backs cache invalidation.
//!
//! # Invariants
//! - Staged writes survive a failed `save` and are dropped only after a
//!   successful commit.
//! - Every successful `save` increments `config_meta.revision` exactly
//!   once, whether or not any entry changed.

use crate::db::ensure_tables;
use crate::store::{ConfigStore, ConfigValue, StoreError, StoreResult};
use log::info;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

/// Invalidation tag carried by projections built from this configuration.
pub const CONFIG_CACHE_TAG: &str = "config:aboutpage.roster";

/// Reference `ConfigStore` implementation over a migrated connection.
pub struct SqliteConfigStore<'conn> {
    conn: &'conn Connection,
    staged: BTreeMap<String, Option<ConfigValue>>,
}

impl<'conn> SqliteConfigStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_tables(conn, &["config_entries", "config_meta"])?;
        Ok(Self {
            conn,
            staged: BTreeMap::new(),
        })
    }

    /// Returns the committed revision counter.
    ///
    /// The revision changes on every save, making `(cache_tag, revision)`
    /// a usable cache key for derived payloads.
    pub fn revision(&self) -> StoreResult<i64> {
        let revision = self.conn.query_row(
            "SELECT revision FROM config_meta WHERE id = 1;",
            [],
            |row| row.get(0),
        )?;
        Ok(revision)
    }

    fn read_committed(&self, key: &str) -> StoreResult<Option<ConfigValue>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM config_entries WHERE name = ?1;")?;
        let mut rows = stmt.query([key])?;

        if let Some(row) = rows.next()? {
            let encoded: String = row.get(0)?;
            let value = serde_json::from_str(&encoded).map_err(|err| {
                StoreError::InvalidData(format!("undecodable value under `{key}`: {err}"))
            })?;
            return Ok(Some(value));
        }

        Ok(None)
    }
}

impl ConfigStore for SqliteConfigStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<ConfigValue>> {
        if let Some(staged) = self.staged.get(key) {
            return Ok(staged.clone());
        }
        self.read_committed(key)
    }

    fn set(&mut self, key: &str, value: ConfigValue) -> &mut Self {
        self.staged.insert(key.to_string(), Some(value));
        self
    }

    fn clear(&mut self, key: &str) -> &mut Self {
        self.staged.insert(key.to_string(), None);
        self
    }

    fn save(&mut self) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        for (key, staged) in &self.staged {
            match staged {
                Some(value) => {
                    let encoded = serde_json::to_string(value).map_err(|err| {
                        StoreError::InvalidData(format!(
                            "unencodable value under `{key}`: {err}"
                        ))
                    })?;
                    tx.execute(
                        "INSERT INTO config_entries (name, value) VALUES (?1, ?2)
                         ON CONFLICT (name) DO UPDATE SET value = excluded.value;",
                        params![key, encoded],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM config_entries WHERE name = ?1;", [key])?;
                }
            }
        }

        tx.execute(
            "UPDATE config_meta SET revision = revision + 1 WHERE id = 1;",
            [],
        )?;
        tx.commit()?;

        let entries = self.staged.len();
        self.staged.clear();
        info!("event=config_save module=store status=ok entries={entries}");
        Ok(())
    }

    fn cache_tag(&self) -> &str {
        CONFIG_CACHE_TAG
    }
}
