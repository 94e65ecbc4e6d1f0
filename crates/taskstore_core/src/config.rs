//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database path and logging settings for harness binaries.
//!
//! # Invariants
//! - Blank variables fall back to defaults instead of failing.
//! - Returned `log_level` is normalized and `log_dir` is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TASKSTORE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TASKSTORE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKSTORE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "taskstore.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "taskstore-logs";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub reason: LoggingError,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.variable, self.reason)
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.reason)
    }
}

/// Settings used to open the store and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl TaskStoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name
    /// to its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(raw) => normalize_level(&raw).map_err(|reason| ConfigError {
                variable: LOG_LEVEL_VAR,
                reason,
            })?,
            None => default_log_level(),
        };

        let log_dir = match read(LOG_DIR_VAR) {
            Some(raw) => normalize_log_dir(&raw).map_err(|reason| ConfigError {
                variable: LOG_DIR_VAR,
                reason,
            })?,
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskStoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = TaskStoreConfig::from_lookup(lookup_from(&[(DB_PATH_VAR, "  ")])).unwrap();
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("taskstore.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn explicit_values_are_normalized() {
        let log_dir = std::env::temp_dir().join("taskstore-config-test");
        let config = TaskStoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_VAR, "/var/lib/taskstore/tasks.db"),
            (LOG_LEVEL_VAR, " WARNING "),
            (LOG_DIR_VAR, log_dir.to_str().unwrap()),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/taskstore/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, log_dir);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = TaskStoreConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "loud")]))
            .unwrap_err();
        assert_eq!(err.variable, LOG_LEVEL_VAR);

        let err = TaskStoreConfig::from_lookup(lookup_from(&[(LOG_DIR_VAR, "relative/logs")]))
            .unwrap_err();
        assert_eq!(err.variable, LOG_DIR_VAR);
    }
}
