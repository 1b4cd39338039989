//! Note/tag use-case service.
//!
//! # Responsibility
//! - Own the `NOTES` and `TAGS` collections and their slot repository.
//! - Provide create/update/delete for notes and tags plus the joined view.
//!
//! # Invariants
//! - Every successful mutation is written to its slot before returning.
//! - Update/delete apply to every record carrying the id; an unknown id is
//!   a no-op and writes nothing.
//! - A failed slot write leaves the in-memory collection unchanged.
//! - Tag deletion never touches `RawNote::tag_ids`; dangling ids are
//!   dropped at join time.
//! - The two slots are written independently, never atomically.

use crate::model::note::{NoteDraft, NoteId, NoteWithTags, RawNote};
use crate::model::tag::{Tag, TagId};
use crate::repo::slot_repo::SlotRepository;
use crate::service::join::{filter_notes, join_note, join_notes_with_tags, NoteFilter};
use crate::store::{MalformedSlotPolicy, Persisted, StoreResult};
use log::info;

/// Slot key holding the serialized `Vec<RawNote>`.
pub const NOTES_SLOT_KEY: &str = "NOTES";
/// Slot key holding the serialized `Vec<Tag>`.
pub const TAGS_SLOT_KEY: &str = "TAGS";

/// Note service facade over one slot repository.
pub struct NoteService<R: SlotRepository> {
    repo: R,
    notes: Persisted<Vec<RawNote>>,
    tags: Persisted<Vec<Tag>>,
}

impl<R: SlotRepository> NoteService<R> {
    /// Hydrates both collections, failing on malformed slot content.
    pub fn load(repo: R) -> StoreResult<Self> {
        Self::load_with_policy(repo, MalformedSlotPolicy::FailFast)
    }

    /// Hydrates both collections (empty when the slots are absent).
    pub fn load_with_policy(repo: R, policy: MalformedSlotPolicy) -> StoreResult<Self> {
        let notes = Persisted::initialize(&repo, NOTES_SLOT_KEY, Vec::new(), policy)?;
        let tags = Persisted::initialize(&repo, TAGS_SLOT_KEY, Vec::new(), policy)?;
        info!(
            "event=notes_load module=service status=ok notes={} tags={} policy={}",
            notes.get().len(),
            tags.get().len(),
            policy.as_str()
        );
        Ok(Self { repo, notes, tags })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn notes(&self) -> &[RawNote] {
        self.notes.get()
    }

    pub fn tags(&self) -> &[Tag] {
        self.tags.get()
    }

    pub fn find_note(&self, id: &str) -> Option<&RawNote> {
        self.notes().iter().find(|note| note.id == id)
    }

    pub fn find_tag(&self, id: &str) -> Option<&Tag> {
        self.tags().iter().find(|tag| tag.id == id)
    }

    /// Joined view of every note, in collection order.
    pub fn notes_with_tags(&self) -> Vec<NoteWithTags> {
        join_notes_with_tags(self.notes(), self.tags())
    }

    /// Joined view of one note.
    pub fn find_note_with_tags(&self, id: &str) -> Option<NoteWithTags> {
        self.find_note(id).map(|note| join_note(note, self.tags()))
    }

    /// Joined view restricted to notes matching `filter`.
    pub fn search_notes(&self, filter: &NoteFilter) -> Vec<NoteWithTags> {
        let joined = self.notes_with_tags();
        filter_notes(&joined, filter).into_iter().cloned().collect()
    }

    /// Appends a new note with a generated id. No field validation.
    pub fn create_note(&mut self, draft: NoteDraft) -> StoreResult<NoteId> {
        let note = RawNote::from_draft(draft);
        let id = note.id.clone();
        let tag_count = note.tag_ids.len();
        self.notes.update(&self.repo, |notes| notes.push(note))?;
        info!("event=note_create module=service status=ok note_id={id} tag_count={tag_count}");
        Ok(id)
    }

    /// Replaces every editable field of each note with `id`.
    ///
    /// Returns `false` (and writes nothing) when no note has that id.
    pub fn update_note(&mut self, id: &str, draft: NoteDraft) -> StoreResult<bool> {
        if self.find_note(id).is_none() {
            info!("event=note_update module=service status=noop note_id={id}");
            return Ok(false);
        }
        let updated = self.notes.update(&self.repo, |notes| {
            let mut updated = 0;
            for note in notes.iter_mut().filter(|note| note.id == id) {
                note.apply_draft(draft.clone());
                updated += 1;
            }
            updated
        })?;
        info!("event=note_update module=service status=ok note_id={id} updated={updated}");
        Ok(true)
    }

    /// Removes the note `id`. Returns whether a note was removed.
    pub fn delete_note(&mut self, id: &str) -> StoreResult<bool> {
        if self.find_note(id).is_none() {
            info!("event=note_delete module=service status=noop note_id={id}");
            return Ok(false);
        }
        self.notes
            .update(&self.repo, |notes| notes.retain(|note| note.id != id))?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(true)
    }

    /// Appends a new tag with a generated id. Duplicate labels are allowed.
    pub fn create_tag(&mut self, label: impl Into<String>) -> StoreResult<TagId> {
        let tag = Tag::new(label);
        let id = tag.id.clone();
        self.add_tag(tag)?;
        Ok(id)
    }

    /// Appends a caller-built tag as-is.
    ///
    /// Id uniqueness is the caller's responsibility, as with generated ids.
    pub fn add_tag(&mut self, tag: Tag) -> StoreResult<()> {
        let id = tag.id.clone();
        self.tags.update(&self.repo, |tags| tags.push(tag))?;
        info!("event=tag_create module=service status=ok tag_id={id}");
        Ok(())
    }

    /// Replaces the label of each tag with `id`. Returns `false` when absent.
    pub fn update_tag(&mut self, id: &str, label: impl Into<String>) -> StoreResult<bool> {
        if self.find_tag(id).is_none() {
            info!("event=tag_update module=service status=noop tag_id={id}");
            return Ok(false);
        }
        let label = label.into();
        let updated = self.tags.update(&self.repo, |tags| {
            let mut updated = 0;
            for tag in tags.iter_mut().filter(|tag| tag.id == id) {
                tag.label.clone_from(&label);
                updated += 1;
            }
            updated
        })?;
        info!("event=tag_update module=service status=ok tag_id={id} updated={updated}");
        Ok(true)
    }

    /// Removes tag `id` from the tag collection only.
    ///
    /// Notes keep the id in `tag_ids`; it simply stops resolving.
    pub fn delete_tag(&mut self, id: &str) -> StoreResult<bool> {
        if self.find_tag(id).is_none() {
            info!("event=tag_delete module=service status=noop tag_id={id}");
            return Ok(false);
        }
        self.tags
            .update(&self.repo, |tags| tags.retain(|tag| tag.id != id))?;
        let dangling = self
            .notes()
            .iter()
            .filter(|note| note.tag_ids.iter().any(|tag_id| tag_id == id))
            .count();
        info!("event=tag_delete module=service status=ok tag_id={id} dangling_notes={dangling}");
        Ok(true)
    }
}
