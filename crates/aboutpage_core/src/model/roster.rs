//! Roster domain types.
//!
//! # Responsibility
//! - Define the persisted roster aggregate (`RosterConfig`), the per-slot
//!   record (`LeaderRecord`) and the ephemeral `EditingSession`.
//!
//! # Invariants
//! - Slot indices are permanent; a deleted index is never reused.
//! - `deleted` holds indices in `[0, group_count)` for session-made
//!   deletions.
//! - `group_count` never decreases across a session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Opaque identifier for externally managed entities (files, users,
/// content items).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = Uuid;

/// One roster slot's profile fields.
///
/// Every field is independently optional; the blank record is a valid
/// submitted value and also the cleared state of a deleted slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRecord {
    /// Display name.
    pub name: String,
    /// Role or title line shown under the name.
    pub designation: String,
    /// Link to the person's LinkedIn profile.
    pub linkedin_link: String,
    /// Reference to a managed profile image file, if one was uploaded.
    pub profile_image: Option<EntityId>,
}

impl LeaderRecord {
    /// Returns whether every field is empty.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.designation.is_empty()
            && self.linkedin_link.is_empty()
            && self.profile_image.is_none()
    }
}

/// Persisted roster aggregate read from flat configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Number of slots ever created, deleted ones included.
    pub group_count: u32,
    /// Indices whose slots were deleted; never reused or renumbered.
    pub deleted: BTreeSet<u32>,
    /// Featured anchor user reference. Required on submit, but may be
    /// absent in storage that predates the first save.
    pub anchor: Option<EntityId>,
}

impl RosterConfig {
    /// Iterates active (non-deleted) slot indices in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.group_count).filter(|index| !self.deleted.contains(index))
    }
}

/// Ephemeral state of one in-progress editing interaction.
///
/// The calling layer round-trips this value between request cycles; core
/// operations are stateless given the session. Serialization support
/// exists so the host can park it in whatever session store it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditingSession {
    /// Slot count currently shown in the form. Only grows.
    pub group_count: u32,
    /// Indices deleted within this interaction. Deletions from earlier
    /// saves are visible only through their cleared fields.
    pub deleted: BTreeSet<u32>,
}

impl EditingSession {
    /// Opens a session over the stored roster.
    ///
    /// A roster that was never saved starts with one empty slot. The
    /// deletion set starts empty: prior deletions are not re-tracked.
    pub fn start(config: &RosterConfig) -> Self {
        Self {
            group_count: config.group_count.max(1),
            deleted: BTreeSet::new(),
        }
    }

    /// Returns whether the slot at `index` is shown by this session.
    pub fn is_active(&self, index: u32) -> bool {
        index < self.group_count && !self.deleted.contains(&index)
    }

    /// Iterates active slot indices in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.group_count).filter(|index| !self.deleted.contains(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{EditingSession, LeaderRecord, RosterConfig};
    use std::collections::BTreeSet;

    #[test]
    fn blank_record_reports_blank() {
        assert!(LeaderRecord::default().is_blank());

        let named = LeaderRecord {
            name: "Alice".to_string(),
            ..LeaderRecord::default()
        };
        assert!(!named.is_blank());
    }

    #[test]
    fn session_starts_with_one_slot_for_fresh_config() {
        let session = EditingSession::start(&RosterConfig::default());
        assert_eq!(session.group_count, 1);
        assert!(session.deleted.is_empty());
    }

    #[test]
    fn session_does_not_repopulate_prior_deletions() {
        let config = RosterConfig {
            group_count: 4,
            deleted: BTreeSet::from([1, 2]),
            anchor: None,
        };

        let session = EditingSession::start(&config);
        assert_eq!(session.group_count, 4);
        assert!(session.deleted.is_empty());
    }

    #[test]
    fn active_indices_skip_deleted_in_order() {
        let session = EditingSession {
            group_count: 5,
            deleted: BTreeSet::from([1, 3]),
        };
        let active: Vec<u32> = session.active_indices().collect();
        assert_eq!(active, vec![0, 2, 4]);
    }
}
