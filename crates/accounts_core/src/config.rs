//! Environment-driven configuration for hosts embedding the core.
//!
//! All variables are read and validated up front so a bad value fails at
//! startup rather than on first write.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::account_repo::DEFAULT_STORAGE_KEY;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "ACCOUNTS_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "ACCOUNTS_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "ACCOUNTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ACCOUNTS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "accounts.sqlite3";

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through `lookup`; unset or blank values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError {
                field: ENV_LOG_LEVEL,
                message,
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            if !Path::new(&dir).is_absolute() {
                return Err(ConfigError {
                    field: ENV_LOG_DIR,
                    message: format!("must be an absolute path, got `{dir}`"),
                });
            }
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_STORAGE_KEY};
    use crate::repo::account_repo::DEFAULT_STORAGE_KEY;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed_and_applied() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /tmp/a.sqlite3 "),
            (ENV_STORAGE_KEY, "tenant-a"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/accounts"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/a.sqlite3"));
        assert_eq!(config.storage_key, "tenant-a");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/accounts")));
    }

    #[test]
    fn blank_storage_key_falls_back_to_default() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_STORAGE_KEY, "   ")])).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert_eq!(err.field, ENV_LOG_LEVEL);

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert_eq!(err.field, ENV_LOG_DIR);
        assert!(err.to_string().contains("absolute"));
    }
}
