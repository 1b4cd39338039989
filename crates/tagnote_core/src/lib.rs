//! Core domain logic for tagnote.
//! Owns the persisted note/tag collections and every rule about them.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use auth::{require_authenticated, AccessError, IdentityProvider, SessionFlag, StaticIdentity};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NoteDraft, NoteId, NoteWithTags, RawNote};
pub use model::tag::{Tag, TagId};
pub use repo::slot_repo::{MemorySlotRepository, SlotRepository, SqliteSlotRepository};
pub use service::join::{filter_notes, join_notes_with_tags, NoteFilter};
pub use service::note_service::{NoteService, NOTES_SLOT_KEY, TAGS_SLOT_KEY};
pub use store::{MalformedSlotPolicy, Persisted, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
