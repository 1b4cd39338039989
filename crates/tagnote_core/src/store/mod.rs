//! Persisted collection store.
//!
//! # Responsibility
//! - Keep one typed in-memory value synchronized with one durable slot.
//! - Surface storage and decoding failures as semantic `StoreError`s.
//!
//! # Invariants
//! - Every in-memory mutation made through `Persisted::update` is followed
//!   by a slot write before the call returns.
//! - Distinct slots are written independently; there is no cross-slot
//!   transaction.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod persisted;

pub use persisted::{MalformedSlotPolicy, Persisted};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while reading, decoding, encoding or writing a slot.
#[derive(Debug)]
pub enum StoreError {
    /// Slot key is empty after trimming.
    InvalidKey(String),
    /// Storage medium failure (open, IO, quota, lock).
    Db(DbError),
    /// Required storage table is missing on the connection.
    MissingSlotTable,
    /// Slot holds content that does not decode into the expected shape.
    MalformedSlot {
        key: String,
        source: serde_json::Error,
    },
    /// Value could not be encoded for storage.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid slot key: `{key}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingSlotTable => write!(f, "slot storage is not initialized"),
            Self::MalformedSlot { key, source } => {
                write!(f, "slot `{key}` holds malformed content: {source}")
            }
            Self::Encode { key, source } => write!(f, "failed to encode slot `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MalformedSlot { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::InvalidKey(_) | Self::MissingSlotTable => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
