//! Roster persistence mapping over the configuration store.
//!
//! # Responsibility
//! - Read the persisted aggregate and per-slot records.
//! - Stage slot writes, slot clears and aggregate writes.
//!
//! # Invariants
//! - Absent `num_groups` reads as zero slots; the editor applies its own
//!   first-session default.
//! - A wrongly-typed persisted value is an `InvalidData` error, never a
//!   silent default.

use crate::model::roster::{LeaderRecord, RosterConfig};
use crate::store::{keys, ConfigStore, ConfigValue, StoreError, StoreResult};
use std::collections::BTreeSet;

/// Reads the persisted roster aggregate.
pub fn read_roster<S: ConfigStore>(store: &S) -> StoreResult<RosterConfig> {
    let group_count = match store.get(keys::NUM_GROUPS)? {
        Some(value) => {
            let count = value
                .as_integer()
                .ok_or_else(|| type_mismatch(keys::NUM_GROUPS, "integer"))?;
            u32::try_from(count).map_err(|_| {
                StoreError::InvalidData(format!(
                    "negative slot count {count} under `{}`",
                    keys::NUM_GROUPS
                ))
            })?
        }
        None => 0,
    };

    let deleted: BTreeSet<u32> = match store.get(keys::DELETED_GROUPS)? {
        Some(value) => value
            .as_indices()
            .ok_or_else(|| type_mismatch(keys::DELETED_GROUPS, "index list"))?
            .iter()
            .copied()
            .collect(),
        None => BTreeSet::new(),
    };

    let anchor = match store.get(keys::ANCHOR_REFERENCE)? {
        Some(value) => Some(
            value
                .as_ref_id()
                .ok_or_else(|| type_mismatch(keys::ANCHOR_REFERENCE, "entity reference"))?,
        ),
        None => None,
    };

    Ok(RosterConfig {
        group_count,
        deleted,
        anchor,
    })
}

/// Reads one slot's record; absent keys read as blank fields.
pub fn read_leader<S: ConfigStore>(store: &S, index: u32) -> StoreResult<LeaderRecord> {
    let profile_image = match store.get(&keys::leader_profile_image(index))? {
        Some(value) => value
            .as_refs()
            .ok_or_else(|| type_mismatch(&keys::leader_profile_image(index), "reference list"))?
            .first()
            .copied(),
        None => None,
    };

    Ok(LeaderRecord {
        name: read_text(store, &keys::leader_name(index))?,
        designation: read_text(store, &keys::leader_designation(index))?,
        linkedin_link: read_text(store, &keys::leader_linkedin_link(index))?,
        profile_image,
    })
}

/// Stages one slot's record under its permanent keys.
pub fn stage_leader<S: ConfigStore>(store: &mut S, index: u32, record: &LeaderRecord) {
    store
        .set(
            &keys::leader_name(index),
            ConfigValue::Text(record.name.clone()),
        )
        .set(
            &keys::leader_designation(index),
            ConfigValue::Text(record.designation.clone()),
        )
        .set(
            &keys::leader_linkedin_link(index),
            ConfigValue::Text(record.linkedin_link.clone()),
        )
        .set(
            &keys::leader_profile_image(index),
            ConfigValue::Refs(record.profile_image.into_iter().collect()),
        );
}

/// Stages removal of one slot's field values. The keys stay assigned to
/// the slot; only the data goes.
pub fn clear_leader<S: ConfigStore>(store: &mut S, index: u32) {
    store
        .clear(&keys::leader_name(index))
        .clear(&keys::leader_designation(index))
        .clear(&keys::leader_linkedin_link(index))
        .clear(&keys::leader_profile_image(index));
}

/// Stages the aggregate keys: slot count, deletion set, anchor reference.
pub fn stage_roster<S: ConfigStore>(store: &mut S, config: &RosterConfig) {
    store.set(
        keys::NUM_GROUPS,
        ConfigValue::Integer(i64::from(config.group_count)),
    );
    store.set(
        keys::DELETED_GROUPS,
        ConfigValue::Indices(config.deleted.iter().copied().collect()),
    );
    match config.anchor {
        Some(anchor) => store.set(keys::ANCHOR_REFERENCE, ConfigValue::Ref(anchor)),
        None => store.clear(keys::ANCHOR_REFERENCE),
    };
}

fn read_text<S: ConfigStore>(store: &S, key: &str) -> StoreResult<String> {
    match store.get(key)? {
        Some(value) => Ok(value
            .as_text()
            .ok_or_else(|| type_mismatch(key, "text"))?
            .to_string()),
        None => Ok(String::new()),
    }
}

fn type_mismatch(key: &str, expected: &str) -> StoreError {
    StoreError::InvalidData(format!("expected {expected} under `{key}`"))
}
