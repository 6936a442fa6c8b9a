//! Core use-case services.
//!
//! # Responsibility
//! - Drive the interactive roster editing workflow.
//! - Build the read-side display payload for page views.
//!
//! # Invariants
//! - Services reach storage and entity data only through the
//!   `ConfigStore`/`EntityLookup` seams.

pub mod roster_editor;
pub mod roster_projector;
