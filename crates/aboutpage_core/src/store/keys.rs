//! Persisted key layout for the roster configuration.
//!
//! # Responsibility
//! - Own every key name written under the roster configuration object.
//!
//! # Invariants
//! - Slot keys are 1-based in storage: index `i` maps to `Leader_{i+1}_*`.
//! - A slot's keys never change once assigned; deletion clears values but
//!   keeps the key positions.

/// Total number of slots ever created.
pub const NUM_GROUPS: &str = "num_groups";

/// Indices of deleted slots.
pub const DELETED_GROUPS: &str = "deleted_groups";

/// Featured anchor user reference.
pub const ANCHOR_REFERENCE: &str = "anchor_reference";

/// Key for a slot's display name.
pub fn leader_name(index: u32) -> String {
    slot_key(index, "name")
}

/// Key for a slot's designation line.
pub fn leader_designation(index: u32) -> String {
    slot_key(index, "designation")
}

/// Key for a slot's LinkedIn profile link.
pub fn leader_linkedin_link(index: u32) -> String {
    slot_key(index, "linkedin_link")
}

/// Key for a slot's profile image reference.
pub fn leader_profile_image(index: u32) -> String {
    slot_key(index, "profile_image")
}

fn slot_key(index: u32, field: &str) -> String {
    format!("Leader_{}_{field}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::{leader_designation, leader_linkedin_link, leader_name, leader_profile_image};

    #[test]
    fn slot_keys_are_one_based() {
        assert_eq!(leader_name(0), "Leader_1_name");
        assert_eq!(leader_designation(1), "Leader_2_designation");
        assert_eq!(leader_linkedin_link(2), "Leader_3_linkedin_link");
        assert_eq!(leader_profile_image(9), "Leader_10_profile_image");
    }
}
