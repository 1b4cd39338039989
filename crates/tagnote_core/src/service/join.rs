//! Derived note/tag join and list filtering.
//!
//! Pure functions over borrowed collections; callers recompute on every
//! change instead of caching.

use crate::model::note::{NoteWithTags, RawNote};
use crate::model::tag::{Tag, TagId};

/// Resolves each note's `tag_ids` against `tags`.
///
/// Resolved tags follow the order of `tags`, a repeated id resolves once,
/// and ids without a matching tag are dropped silently.
pub fn join_notes_with_tags(notes: &[RawNote], tags: &[Tag]) -> Vec<NoteWithTags> {
    notes.iter().map(|note| join_note(note, tags)).collect()
}

/// Resolves one note against `tags`.
pub fn join_note(note: &RawNote, tags: &[Tag]) -> NoteWithTags {
    NoteWithTags {
        id: note.id.clone(),
        title: note.title.clone(),
        content: note.content.clone(),
        tags: tags
            .iter()
            .filter(|tag| note.tag_ids.contains(&tag.id))
            .cloned()
            .collect(),
    }
}

/// List-view filter over joined notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive title substring. Blank matches every note.
    pub title: String,
    /// Every listed tag must be present on the note.
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn matches(&self, note: &NoteWithTags) -> bool {
        let query = self.title.trim().to_lowercase();
        let title_ok = query.is_empty() || note.title.to_lowercase().contains(&query);
        title_ok
            && self
                .tag_ids
                .iter()
                .all(|wanted| note.tags.iter().any(|tag| &tag.id == wanted))
    }
}

/// Keeps the notes matching `filter`, preserving order.
pub fn filter_notes<'a>(
    notes: &'a [NoteWithTags],
    filter: &NoteFilter,
) -> Vec<&'a NoteWithTags> {
    notes.iter().filter(|note| filter.matches(note)).collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_notes, join_notes_with_tags, NoteFilter};
    use crate::model::note::RawNote;
    use crate::model::tag::Tag;

    fn note(id: &str, title: &str, tag_ids: &[&str]) -> RawNote {
        RawNote {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            tag_ids: tag_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn join_follows_tag_collection_order_and_drops_dangling_ids() {
        let tags = vec![Tag::with_id("t1", "work"), Tag::with_id("t2", "home")];
        let notes = vec![note("n1", "a", &["t2", "gone", "t1", "t2"])];

        let joined = join_notes_with_tags(&notes, &tags);
        assert_eq!(joined.len(), 1);
        let labels: Vec<&str> = joined[0].tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["work", "home"]);
    }

    #[test]
    fn join_is_deterministic() {
        let tags = vec![Tag::with_id("t1", "work")];
        let notes = vec![note("n1", "a", &["t1"]), note("n2", "b", &[])];
        assert_eq!(
            join_notes_with_tags(&notes, &tags),
            join_notes_with_tags(&notes, &tags)
        );
    }

    #[test]
    fn filter_requires_title_match_and_every_selected_tag() {
        let tags = vec![Tag::with_id("t1", "work"), Tag::with_id("t2", "urgent")];
        let notes = vec![
            note("n1", "Quarterly Plan", &["t1", "t2"]),
            note("n2", "Plan groceries", &["t1"]),
            note("n3", "Diary", &[]),
        ];
        let joined = join_notes_with_tags(&notes, &tags);

        let all = filter_notes(&joined, &NoteFilter::default());
        assert_eq!(all.len(), 3);

        let by_title = NoteFilter {
            title: "plan".to_string(),
            tag_ids: Vec::new(),
        };
        assert_eq!(filter_notes(&joined, &by_title).len(), 2);

        let by_both = NoteFilter {
            title: "PLAN".to_string(),
            tag_ids: vec!["t1".to_string(), "t2".to_string()],
        };
        let hits = filter_notes(&joined, &by_both);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "n1");
    }
}
