//! Environment-driven core configuration.
//!
//! # Responsibility
//! - Resolve database path, logging settings and slot decoding policy.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Invalid values are reported, never silently replaced.

use crate::logging::{default_log_level, normalize_level};
use crate::store::MalformedSlotPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TAGNOTE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TAGNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TAGNOTE_LOG_DIR";
pub const ENV_MALFORMED_SLOTS: &str = "TAGNOTE_MALFORMED_SLOTS";

const DEFAULT_DB_FILE_NAME: &str = "tagnote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, message } => write!(f, "invalid `{var}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub malformed_slot_policy: MalformedSlotPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            malformed_slot_policy: MalformedSlotPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| {
                ConfigError::InvalidValue {
                    var: ENV_LOG_LEVEL,
                    message,
                }
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        if let Some(policy) = read(ENV_MALFORMED_SLOTS) {
            config.malformed_slot_policy =
                MalformedSlotPolicy::parse(&policy).ok_or_else(|| ConfigError::InvalidValue {
                    var: ENV_MALFORMED_SLOTS,
                    message: format!("unsupported policy `{policy}`; expected fail|default"),
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ConfigError, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_MALFORMED_SLOTS};
    use crate::store::MalformedSlotPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("tagnote.sqlite3"));
    }

    #[test]
    fn variables_override_defaults_and_blank_is_unset() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /data/notes.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_MALFORMED_SLOTS, "default"),
            ("TAGNOTE_LOG_DIR", "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.malformed_slot_policy, MalformedSlotPolicy::UseDefault);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_MALFORMED_SLOTS, "ignore")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == ENV_MALFORMED_SLOTS
        ));

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(err.to_string().contains("TAGNOTE_LOG_LEVEL"));
    }
}
