//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note/tag CRUD and the joined list view to Dart via FRB.
//! - Gate every data call on the host-provided authentication signal.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in-band (`ok=false` + message), never thrown.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tagnote_core::db::open_db;
use tagnote_core::{
    core_version as core_version_inner,
    init_logging as init_logging_inner, ping as ping_inner, require_authenticated, CoreConfig,
    IdentityProvider, MalformedSlotPolicy, NoteDraft, NoteFilter, NoteService, NoteWithTags,
    SessionFlag, SqliteSlotRepository, StoreResult, Tag,
};

static SESSION: SessionFlag = SessionFlag::new(false);
static CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Records the identity provider's login state for this process.
///
/// Called by the host after the external provider completes login or logout.
#[flutter_rust_bridge::frb(sync)]
pub fn set_authenticated(authenticated: bool) {
    SESSION.set_authenticated(authenticated);
}

#[flutter_rust_bridge::frb(sync)]
pub fn is_authenticated() -> bool {
    SESSION.is_authenticated()
}

/// Tag projection returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub id: String,
    pub label: String,
}

/// Joined note projection returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    /// Raw markdown body.
    pub content: String,
    /// Resolved tags; dangling references are already dropped.
    pub tags: Vec<TagItem>,
}

/// Response envelope for note list/detail calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Response envelope for tag list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsResponse {
    pub ok: bool,
    pub items: Vec<TagItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the call completed without error.
    pub ok: bool,
    /// Created record id, when the call creates one.
    pub id: Option<String>,
    /// Whether the target record existed (update/delete only).
    pub found: bool,
    pub message: String,
}

impl ActionResponse {
    fn created(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            found: true,
            message: message.into(),
        }
    }

    fn changed(found: bool, hit: &str, miss: &str) -> Self {
        Self {
            ok: true,
            id: None,
            found,
            message: (if found { hit } else { miss }).to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            found: false,
            message: message.into(),
        }
    }
}

impl NotesResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

impl TagsResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Lists joined notes filtered by title substring and required tag ids.
///
/// Empty `title_query` and empty `tag_ids` list every note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(title_query: String, tag_ids: Vec<String>) -> NotesResponse {
    match global_context() {
        Ok(ctx) => ctx.notes_list(title_query, tag_ids),
        Err(err) => NotesResponse::failure(err),
    }
}

/// Gets one joined note. `items` is empty when the id is unknown.
#[flutter_rust_bridge::frb(sync)]
pub fn note_get(id: String) -> NotesResponse {
    match global_context() {
        Ok(ctx) => ctx.note_get(&id),
        Err(err) => NotesResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_create(title: String, content: String, tag_ids: Vec<String>) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.note_create(NoteDraft::new(title, content, tag_ids)),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_update(
    id: String,
    title: String,
    content: String,
    tag_ids: Vec<String>,
) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.note_update(&id, NoteDraft::new(title, content, tag_ids)),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.note_delete(&id),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tags_list() -> TagsResponse {
    match global_context() {
        Ok(ctx) => ctx.tags_list(),
        Err(err) => TagsResponse::failure(err),
    }
}

/// Creates a tag. Pass `id` to keep a tag built inline by the editor.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_create(label: String, id: Option<String>) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.tag_create(label, id),
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tag_update(id: String, label: String) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.tag_update(&id, label),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Deletes a tag. Notes keep the id; it stops resolving in lists.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_delete(id: String) -> ActionResponse {
    match global_context() {
        Ok(ctx) => ctx.tag_delete(&id),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Resolved call environment: identity signal plus storage location.
struct FfiContext<'a> {
    identity: &'a dyn IdentityProvider,
    db_path: PathBuf,
    policy: MalformedSlotPolicy,
}

fn global_context() -> Result<FfiContext<'static>, String> {
    let config = CONFIG
        .get_or_init(|| CoreConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|err| format!("configuration error: {err}"))?;
    Ok(FfiContext {
        identity: &SESSION,
        db_path: config.db_path.clone(),
        policy: config.malformed_slot_policy,
    })
}

impl FfiContext<'_> {
    fn with_service<T>(
        &self,
        op: &str,
        f: impl FnOnce(&mut NoteService<SqliteSlotRepository<'_>>) -> StoreResult<T>,
    ) -> Result<T, String> {
        require_authenticated(self.identity).map_err(|err| {
            warn!("event=ffi_call module=ffi status=rejected op={op} reason=unauthenticated");
            format!("{op} failed: {err}")
        })?;
        let conn = open_db(&self.db_path).map_err(|err| format!("{op} failed: {err}"))?;
        let repo =
            SqliteSlotRepository::try_new(&conn).map_err(|err| format!("{op} failed: {err}"))?;
        let mut service = NoteService::load_with_policy(repo, self.policy)
            .map_err(|err| format!("{op} failed: {err}"))?;
        f(&mut service).map_err(|err| format!("{op} failed: {err}"))
    }

    fn notes_list(&self, title_query: String, tag_ids: Vec<String>) -> NotesResponse {
        let filter = NoteFilter {
            title: title_query,
            tag_ids,
        };
        match self.with_service("notes_list", |service| Ok(service.search_notes(&filter))) {
            Ok(notes) => {
                let items: Vec<NoteItem> = notes.into_iter().map(to_note_item).collect();
                let message = if items.is_empty() {
                    "No notes.".to_string()
                } else {
                    format!("Found {} note(s).", items.len())
                };
                NotesResponse {
                    ok: true,
                    items,
                    message,
                }
            }
            Err(err) => NotesResponse::failure(err),
        }
    }

    fn note_get(&self, id: &str) -> NotesResponse {
        match self.with_service("note_get", |service| Ok(service.find_note_with_tags(id))) {
            Ok(Some(note)) => NotesResponse {
                ok: true,
                items: vec![to_note_item(note)],
                message: "Note found.".to_string(),
            },
            Ok(None) => NotesResponse {
                ok: true,
                items: Vec::new(),
                message: "Note not found.".to_string(),
            },
            Err(err) => NotesResponse::failure(err),
        }
    }

    fn note_create(&self, draft: NoteDraft) -> ActionResponse {
        match self.with_service("note_create", |service| service.create_note(draft)) {
            Ok(id) => ActionResponse::created("Note created.", id),
            Err(err) => ActionResponse::failure(err),
        }
    }

    fn note_update(&self, id: &str, draft: NoteDraft) -> ActionResponse {
        match self.with_service("note_update", |service| service.update_note(id, draft)) {
            Ok(found) => ActionResponse::changed(found, "Note updated.", "Note not found."),
            Err(err) => ActionResponse::failure(err),
        }
    }

    fn note_delete(&self, id: &str) -> ActionResponse {
        match self.with_service("note_delete", |service| service.delete_note(id)) {
            Ok(found) => ActionResponse::changed(found, "Note deleted.", "Note not found."),
            Err(err) => ActionResponse::failure(err),
        }
    }

    fn tags_list(&self) -> TagsResponse {
        match self.with_service("tags_list", |service| Ok(service.tags().to_vec())) {
            Ok(tags) => TagsResponse {
                ok: true,
                message: format!("Found {} tag(s).", tags.len()),
                items: tags.into_iter().map(to_tag_item).collect(),
            },
            Err(err) => TagsResponse::failure(err),
        }
    }

    fn tag_create(&self, label: String, id: Option<String>) -> ActionResponse {
        let requested_id = id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let result = self.with_service("tag_create", |service| match requested_id {
            Some(id) => service
                .add_tag(Tag::with_id(id.clone(), label))
                .map(|()| id),
            None => service.create_tag(label),
        });
        match result {
            Ok(id) => ActionResponse::created("Tag created.", id),
            Err(err) => ActionResponse::failure(err),
        }
    }

    fn tag_update(&self, id: &str, label: String) -> ActionResponse {
        match self.with_service("tag_update", |service| service.update_tag(id, label)) {
            Ok(found) => ActionResponse::changed(found, "Tag updated.", "Tag not found."),
            Err(err) => ActionResponse::failure(err),
        }
    }

    fn tag_delete(&self, id: &str) -> ActionResponse {
        match self.with_service("tag_delete", |service| service.delete_tag(id)) {
            Ok(found) => ActionResponse::changed(found, "Tag deleted.", "Tag not found."),
            Err(err) => ActionResponse::failure(err),
        }
    }
}

fn to_note_item(note: NoteWithTags) -> NoteItem {
    NoteItem {
        id: note.id,
        title: note.title,
        content: note.content,
        tags: note.tags.into_iter().map(to_tag_item).collect(),
    }
}

fn to_tag_item(tag: Tag) -> TagItem {
    TagItem {
        id: tag.id,
        label: tag.label,
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, FfiContext};
    use tagnote_core::{MalformedSlotPolicy, NoteDraft, StaticIdentity};

    const SIGNED_IN: StaticIdentity = StaticIdentity(true);
    const SIGNED_OUT: StaticIdentity = StaticIdentity(false);

    fn context(
        dir: &tempfile::TempDir,
        identity: &'static StaticIdentity,
    ) -> FfiContext<'static> {
        FfiContext {
            identity,
            db_path: dir.path().join("tagnote.sqlite3"),
            policy: MalformedSlotPolicy::FailFast,
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn unauthenticated_calls_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, &SIGNED_OUT);

        let created = ctx.note_create(NoteDraft::new("a", "b", Vec::<String>::new()));
        assert!(!created.ok);
        assert!(created.message.contains("not authenticated"));

        let listed = ctx.notes_list(String::new(), Vec::new());
        assert!(!listed.ok);
        assert!(!dir.path().join("tagnote.sqlite3").exists());
    }

    #[test]
    fn created_note_is_listed_with_resolved_tags() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, &SIGNED_IN);

        let tag = ctx.tag_create("work".to_string(), None);
        assert!(tag.ok, "{}", tag.message);
        let tag_id = tag.id.expect("tag create should return id");

        let note = ctx.note_create(NoteDraft::new(
            "Plan",
            "# Goals\n![cover](cover.png) ship it",
            [tag_id.clone()],
        ));
        assert!(note.ok, "{}", note.message);

        let listed = ctx.notes_list("plan".to_string(), vec![tag_id.clone()]);
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        let item = &listed.items[0];
        assert_eq!(item.tags.len(), 1);
        assert_eq!(item.tags[0].id, tag_id);
        assert_eq!(item.title, "Plan");
        assert_eq!(item.content, "# Goals\n![cover](cover.png) ship it");
    }

    #[test]
    fn tag_delete_keeps_note_and_drops_tag_from_view() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, &SIGNED_IN);

        let tag = ctx.tag_create("inline".to_string(), Some("editor-tag-1".to_string()));
        assert_eq!(tag.id.as_deref(), Some("editor-tag-1"));
        let note = ctx.note_create(NoteDraft::new("a", "b", ["editor-tag-1"]));
        let note_id = note.id.unwrap();

        let deleted = ctx.tag_delete("editor-tag-1");
        assert!(deleted.ok && deleted.found);

        let fetched = ctx.note_get(&note_id);
        assert_eq!(fetched.items.len(), 1);
        assert!(fetched.items[0].tags.is_empty());
        assert!(ctx.tags_list().items.is_empty());
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, &SIGNED_IN);

        let missing = ctx.note_update("nope", NoteDraft::default());
        assert!(missing.ok);
        assert!(!missing.found);

        let note_id = ctx.note_create(NoteDraft::default()).id.unwrap();
        let updated = ctx.note_update(&note_id, NoteDraft::new("t", "c", Vec::<String>::new()));
        assert!(updated.found);
        assert_eq!(ctx.note_get(&note_id).items[0].title, "t");

        assert!(ctx.note_delete(&note_id).found);
        assert!(!ctx.note_delete(&note_id).found);
        assert!(ctx.note_get(&note_id).items.is_empty());
        assert!(!ctx.tag_update("nope", "x".to_string()).found);
    }
}
