//! Roster editing service.
//!
//! # Responsibility
//! - Track session state across add/delete round-trips of one editing
//!   interaction.
//! - Translate the final session into one atomic configuration save.
//!
//! # Invariants
//! - `group_count` only grows; deletion adds to the session set and never
//!   renumbers surviving slots.
//! - Deleting a slot clears its persisted fields immediately, not at
//!   submit time.
//! - A submit without an anchor reference writes nothing.

use crate::model::roster::{EditingSession, EntityId, LeaderRecord, RosterConfig};
use crate::repo::roster_repo;
use crate::store::{ConfigStore, StoreError, StoreResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DELETE_ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^delete_(\d+)$").expect("valid delete action regex"));

/// Editing-workflow error.
#[derive(Debug)]
pub enum EditError {
    /// Delete targeted an index outside the current slot range.
    InvalidSlot { index: u32, group_count: u32 },
    /// Submit is missing the required anchor reference.
    MissingAnchor,
    /// Persistence failure; session state stays valid for a retry.
    Store(StoreError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlot { index, group_count } => {
                write!(f, "slot {index} is out of range (0..{group_count})")
            }
            Self::MissingAnchor => write!(f, "an anchor reference is required"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EditError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Region of the form the caller must redraw after a session mutation.
///
/// Add/delete redraw exactly the roster subtree so other in-progress edits
/// on the same form survive the round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    GroupsRegion,
}

/// One editable slot with its currently stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderSlot {
    pub index: u32,
    /// Stored record; blank if the slot was cleared or never saved.
    pub record: LeaderRecord,
}

/// Editing service over a configuration store.
pub struct RosterEditor<S: ConfigStore> {
    store: S,
}

impl<S: ConfigStore> RosterEditor<S> {
    /// Creates an editor using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens an editing session over the stored roster.
    pub fn start(&self) -> StoreResult<EditingSession> {
        let config = roster_repo::read_roster(&self.store)?;
        Ok(EditingSession::start(&config))
    }

    /// Returns the editable slots for the session, in slot order, each
    /// carrying its currently stored values.
    pub fn render_fields(&self, session: &EditingSession) -> StoreResult<Vec<LeaderSlot>> {
        session
            .active_indices()
            .map(|index| {
                roster_repo::read_leader(&self.store, index)
                    .map(|record| LeaderSlot { index, record })
            })
            .collect()
    }

    /// Appends one empty slot to the session.
    ///
    /// Touches no persisted state; existing slots keep their indices and
    /// stored values.
    pub fn add_group(&self, session: &mut EditingSession) -> Refresh {
        session.group_count += 1;
        Refresh::GroupsRegion
    }

    /// Deletes the slot at `index` within the session.
    ///
    /// # Contract
    /// - Fails with `InvalidSlot` when `index >= group_count`.
    /// - Deleting an already-deleted index is a no-op.
    /// - The slot's persisted fields are cleared and saved immediately, so
    ///   concurrent readers never see stale data for a deleted slot. The
    ///   stored `num_groups`/`deleted_groups` stay untouched until submit.
    pub fn delete_group(
        &mut self,
        session: &mut EditingSession,
        index: u32,
    ) -> Result<Refresh, EditError> {
        if index >= session.group_count {
            return Err(EditError::InvalidSlot {
                index,
                group_count: session.group_count,
            });
        }

        if session.deleted.contains(&index) {
            return Ok(Refresh::GroupsRegion);
        }

        roster_repo::clear_leader(&mut self.store, index);
        self.store.save()?;
        session.deleted.insert(index);

        info!("event=roster_delete module=editor status=ok slot={index}");
        Ok(Refresh::GroupsRegion)
    }

    /// Resolves the session into one persisted configuration save.
    ///
    /// # Contract
    /// - Fails with `MissingAnchor` before anything is staged when the
    ///   required anchor reference is absent.
    /// - Every active slot is written; a slot missing from `field_values`
    ///   is written as the blank record.
    /// - The stored deletion set is merged with the session's: slots are
    ///   never resurrected and never renumbered.
    /// - All keys commit in a single save.
    ///
    /// # Errors
    /// - `EditError::Store` when the save fails; the session and staged
    ///   writes survive so the submit can be retried.
    pub fn submit(
        &mut self,
        session: &EditingSession,
        field_values: &BTreeMap<u32, LeaderRecord>,
        anchor: Option<EntityId>,
    ) -> Result<RosterConfig, EditError> {
        let anchor = anchor.ok_or(EditError::MissingAnchor)?;

        let stored = roster_repo::read_roster(&self.store)?;
        let mut deleted = stored.deleted;
        deleted.extend(session.deleted.iter().copied());

        for index in session.active_indices() {
            let record = field_values.get(&index).cloned().unwrap_or_default();
            roster_repo::stage_leader(&mut self.store, index, &record);
        }

        let config = RosterConfig {
            group_count: session.group_count,
            deleted,
            anchor: Some(anchor),
        };
        roster_repo::stage_roster(&mut self.store, &config);
        self.store.save()?;

        info!(
            "event=roster_submit module=editor status=ok groups={} deleted={}",
            config.group_count,
            config.deleted.len()
        );
        Ok(config)
    }
}

/// Parses a `delete_{i}` form action name into its slot index.
pub fn parse_delete_action(name: &str) -> Option<u32> {
    DELETE_ACTION_RE
        .captures(name)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}
