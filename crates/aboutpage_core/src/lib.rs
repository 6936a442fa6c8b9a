//! Core domain logic for the about-page roster module.
//! This crate is the single source of truth for roster editing and
//! projection invariants.

pub mod db;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging};
pub use lookup::{
    ContentItem, ContentQuery, EntityLookup, FileEntity, LookupError, LookupResult,
    SqliteEntityLookup, UserEntity,
};
pub use model::roster::{EditingSession, EntityId, LeaderRecord, RosterConfig};
pub use service::roster_editor::{
    parse_delete_action, EditError, LeaderSlot, Refresh, RosterEditor,
};
pub use service::roster_projector::{
    DisplayEntry, DisplayPayload, RosterProjector, ROSTER_ASSET_BUNDLE,
};
pub use store::{
    ConfigStore, ConfigValue, SqliteConfigStore, StoreError, StoreResult, CONFIG_CACHE_TAG,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
