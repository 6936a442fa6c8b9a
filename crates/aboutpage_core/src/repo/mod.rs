//! Mapping layer between domain types and flat configuration keys.
//!
//! # Responsibility
//! - Translate `RosterConfig`/`LeaderRecord` to and from the persisted key
//!   layout, against any `ConfigStore` implementation.
//!
//! # Invariants
//! - Read paths reject undecodable persisted values instead of masking
//!   them.
//! - Write paths only stage; committing is the caller's decision.

pub mod roster_repo;
