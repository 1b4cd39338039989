//! Slot repository contract plus SQLite and in-memory implementations.
//!
//! # Invariants
//! - Keys are trimmed and must be non-empty.
//! - `write_slot` is an upsert; no version check, no locking.

use crate::store::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Raw persistence adapter over named string slots.
pub trait SlotRepository {
    /// Returns the serialized slot value, or `None` when the slot is absent.
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any prior content.
    fn write_slot(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Lists stored slot keys in ascending order.
    fn slot_keys(&self) -> StoreResult<Vec<String>>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write_slot(key, value)
    }

    fn slot_keys(&self) -> StoreResult<Vec<String>> {
        (**self).slot_keys()
    }
}

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StoreError::MissingSlotTable);
        }
        Ok(Self { conn })
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> StoreResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn slot_keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM slots ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

/// Process-local slot repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlotRepository {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> StoreResult<()> {
        let key = normalize_key(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn slot_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.slots.borrow().keys().cloned().collect())
    }
}

fn normalize_key(key: &str) -> StoreResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotRepository, SlotRepository};
    use crate::store::StoreError;

    #[test]
    fn memory_repository_overwrites_existing_slot() {
        let repo = MemorySlotRepository::new();
        assert_eq!(repo.read_slot("NOTES").unwrap(), None);

        repo.write_slot("NOTES", "[]").unwrap();
        repo.write_slot("NOTES", "[1]").unwrap();
        assert_eq!(repo.read_slot("NOTES").unwrap().as_deref(), Some("[1]"));
        assert_eq!(repo.slot_keys().unwrap(), vec!["NOTES".to_string()]);
    }

    #[test]
    fn blank_keys_are_rejected() {
        let repo = MemorySlotRepository::new();
        let err = repo.write_slot("  ", "[]").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
