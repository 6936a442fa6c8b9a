//! Domain model for the about-page roster.
//!
//! # Responsibility
//! - Define the persisted roster aggregate and the ephemeral editing
//!   session shared by the editor and projector services.
//!
//! # Invariants
//! - Roster slots keep their index forever; deletion never renumbers.
//! - Deletion is represented by an index set plus blanked fields, not by
//!   removing slots.

pub mod roster;
