//! Typed value mirrored into one durable slot.
//!
//! # Invariants
//! - An absent slot initializes to the caller's default without writing.
//! - Malformed slot content is handled by an explicit `MalformedSlotPolicy`.

use crate::repo::slot_repo::SlotRepository;
use crate::store::{StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// What to do when a slot exists but does not decode into the expected type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedSlotPolicy {
    /// Return `StoreError::MalformedSlot` and leave the slot untouched.
    #[default]
    FailFast,
    /// Log a warning and start from the default value. The slot is only
    /// overwritten by the next write.
    UseDefault,
}

impl MalformedSlotPolicy {
    /// Parses the configuration spelling (`fail` | `default`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" | "fail_fast" => Some(Self::FailFast),
            "default" | "use_default" => Some(Self::UseDefault),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail",
            Self::UseDefault => "default",
        }
    }
}

/// In-memory value kept in sync with the slot named `key`.
#[derive(Debug, Clone)]
pub struct Persisted<T> {
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads the value stored under `key`, or `default` if the slot is absent.
    ///
    /// # Errors
    /// - Storage failures from `repo`.
    /// - `StoreError::MalformedSlot` under `MalformedSlotPolicy::FailFast`.
    pub fn initialize<R: SlotRepository + ?Sized>(
        repo: &R,
        key: impl Into<String>,
        default: T,
        policy: MalformedSlotPolicy,
    ) -> StoreResult<Self> {
        let key = key.into();
        let Some(raw) = repo.read_slot(&key)? else {
            debug!("event=slot_load module=store status=absent key={key}");
            return Ok(Self {
                key,
                value: default,
            });
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!(
                    "event=slot_load module=store status=ok key={key} bytes={}",
                    raw.len()
                );
                Ok(Self { key, value })
            }
            Err(source) => match policy {
                MalformedSlotPolicy::FailFast => Err(StoreError::MalformedSlot { key, source }),
                MalformedSlotPolicy::UseDefault => {
                    warn!(
                        "event=slot_load module=store status=fallback key={key} error={source}"
                    );
                    Ok(Self {
                        key,
                        value: default,
                    })
                }
            },
        }
    }

    /// Applies `mutate` to a copy of the value, writes the copy, and only
    /// then replaces the in-memory value.
    ///
    /// On a failed write the in-memory value is left exactly as before.
    /// Returns whatever `mutate` returns.
    pub fn update<R, O>(&mut self, repo: &R, mutate: impl FnOnce(&mut T) -> O) -> StoreResult<O>
    where
        R: SlotRepository + ?Sized,
        T: Clone,
    {
        let mut staged = self.value.clone();
        let output = mutate(&mut staged);
        write_value(repo, &self.key, &staged)?;
        self.value = staged;
        Ok(output)
    }
}

impl<T> Persisted<T> {
    pub fn get(&self) -> &T {
        &self.value
    }
}

fn write_value<R, T>(repo: &R, key: &str, value: &T) -> StoreResult<()>
where
    R: SlotRepository + ?Sized,
    T: Serialize,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    repo.write_slot(key, &encoded)?;
    debug!(
        "event=slot_write module=store status=ok key={key} bytes={}",
        encoded.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MalformedSlotPolicy, Persisted};
    use crate::repo::slot_repo::{MemorySlotRepository, SlotRepository};
    use crate::store::StoreError;

    #[test]
    fn absent_slot_yields_default_without_writing() {
        let repo = MemorySlotRepository::new();
        let persisted =
            Persisted::initialize(&repo, "NOTES", vec![1_u32], MalformedSlotPolicy::FailFast)
                .unwrap();
        assert_eq!(persisted.get(), &vec![1]);
        assert_eq!(repo.read_slot("NOTES").unwrap(), None);
    }

    #[test]
    fn update_writes_through_to_slot() {
        let repo = MemorySlotRepository::new();
        let mut persisted =
            Persisted::initialize(&repo, "NUMS", Vec::<u32>::new(), MalformedSlotPolicy::FailFast)
                .unwrap();
        let len = persisted
            .update(&repo, |values| {
                values.push(7);
                values.len()
            })
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(repo.read_slot("NUMS").unwrap().as_deref(), Some("[7]"));

        let reloaded =
            Persisted::initialize(&repo, "NUMS", Vec::<u32>::new(), MalformedSlotPolicy::FailFast)
                .unwrap();
        assert_eq!(reloaded.get(), &vec![7]);
    }

    #[test]
    fn malformed_slot_fails_fast_by_default() {
        let repo = MemorySlotRepository::new();
        repo.write_slot("NUMS", "{not json").unwrap();
        let err = Persisted::initialize(
            &repo,
            "NUMS",
            Vec::<u32>::new(),
            MalformedSlotPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::MalformedSlot { ref key, .. } if key == "NUMS"));
    }

    #[test]
    fn malformed_slot_can_fall_back_to_default() {
        let repo = MemorySlotRepository::new();
        repo.write_slot("NUMS", "\"wrong shape\"").unwrap();
        let persisted =
            Persisted::initialize(&repo, "NUMS", vec![3_u32], MalformedSlotPolicy::UseDefault)
                .unwrap();
        assert_eq!(persisted.get(), &vec![3]);
        assert_eq!(
            repo.read_slot("NUMS").unwrap().as_deref(),
            Some("\"wrong shape\"")
        );
    }

    #[test]
    fn policy_parses_config_spellings() {
        assert_eq!(
            MalformedSlotPolicy::parse(" FAIL "),
            Some(MalformedSlotPolicy::FailFast)
        );
        assert_eq!(
            MalformedSlotPolicy::parse("default"),
            Some(MalformedSlotPolicy::UseDefault)
        );
        assert_eq!(MalformedSlotPolicy::parse("maybe"), None);
    }
}
