//! Tag record.

use serde::{Deserialize, Serialize};

/// Stable tag identifier. Persisted as a plain string.
pub type TagId = String;

/// Label attached to notes by id.
///
/// Labels are free text and may collide across tags; only `id` is identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    /// Creates a tag with a freshly generated id.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(super::generate_id(), label)
    }

    /// Creates a tag with a caller-provided id.
    pub fn with_id(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
