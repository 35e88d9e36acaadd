//! Centralized console configuration.
//!
//! Loaded via the `config` crate from environment variables prefixed with
//! `SCORECARD`, using `__` as the nesting separator
//! (e.g. `SCORECARD__STORAGE__PATH`).

use serde::Deserialize;
use std::path::PathBuf;

/// Console configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    /// Session storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the session record lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Session file path.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Keep the session in memory only; nothing survives a restart.
    #[serde(default)]
    pub in_memory: bool,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".scorecard").join("session.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            in_memory: false,
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("SCORECARD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ConsoleConfig {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_environment(environment().source(Some(map)))
            .expect("valid configuration")
    }

    #[test]
    fn storage_config_has_correct_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.path, PathBuf::from(".scorecard/session.json"));
        assert!(!config.in_memory);
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]);
        assert_eq!(config.storage.path, default_storage_path());
        assert!(!config.storage.in_memory);
    }

    #[test]
    fn environment_overrides_storage() {
        let config = load(&[
            ("SCORECARD__STORAGE__PATH", "/tmp/scorecard.json"),
            ("SCORECARD__STORAGE__IN_MEMORY", "true"),
        ]);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/scorecard.json"));
        assert!(config.storage.in_memory);
    }
}
