//! Note records: the persisted raw form and the joined projection.

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};

/// Stable note identifier. Persisted as a plain string.
pub type NoteId = String;

/// Note as stored in the `NOTES` slot.
///
/// Field names are serialized in camelCase (`tagIds`) to keep the slot
/// layout stable across front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub id: NoteId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Ordered tag references; unresolved ids are kept as-is.
    pub tag_ids: Vec<TagId>,
}

impl RawNote {
    /// Builds a note with a freshly generated id from editable fields.
    pub fn from_draft(draft: NoteDraft) -> Self {
        Self {
            id: super::generate_id(),
            title: draft.title,
            content: draft.content,
            tag_ids: draft.tag_ids,
        }
    }

    /// Replaces every editable field, keeping `id`.
    pub fn apply_draft(&mut self, draft: NoteDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.tag_ids = draft.tag_ids;
    }
}

/// Editable note fields submitted by a create or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<TagId>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tag_ids: impl IntoIterator<Item = impl Into<TagId>>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag_ids: tag_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a draft from selected tag records, keeping only their ids.
    pub fn with_tags(title: impl Into<String>, content: impl Into<String>, tags: &[Tag]) -> Self {
        Self::new(title, content, tags.iter().map(|tag| tag.id.clone()))
    }
}

/// Derived projection: a raw note with its tag references resolved.
///
/// Recomputed from the two collections on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteWithTags {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Vec<Tag>,
}
