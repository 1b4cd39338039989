//! Note/tag relational layer.
//!
//! # Responsibility
//! - CRUD over the two persisted collections.
//! - Derived join and list filtering, recomputed on demand.

pub mod join;
pub mod note_service;
