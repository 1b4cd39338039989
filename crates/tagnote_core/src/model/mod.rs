//! Note/tag domain model.
//!
//! # Responsibility
//! - Define the records persisted in the `NOTES` and `TAGS` slots.
//! - Define the derived joined projection handed to list/detail views.
//!
//! # Invariants
//! - Ids are unique within their own collection (random, not verified).
//! - `RawNote::tag_ids` may reference tags that no longer exist.

pub mod note;
pub mod tag;

use uuid::Uuid;

/// Generates a fresh random record id in hyphenated UUID v4 form.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
