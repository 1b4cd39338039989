//! Slot persistence adapters.
//!
//! # Responsibility
//! - Define the raw `read/write` contract over named string slots.
//! - Keep SQLite details out of the typed store and services.
//!
//! # Invariants
//! - Writes replace the whole slot value (last write wins).

pub mod slot_repo;
