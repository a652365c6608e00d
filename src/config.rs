//! Layered configuration.
//!
//! Settings come from three layers, lowest priority first:
//! 1. Compiled defaults ([`Config::default()`])
//! 2. User file `<config_dir>/taches/config.yaml`
//! 3. Environment: `TACHES_DB` overrides the database path
//!
//! The CLI applies `--db` on top of all three.

use crate::storage::DB_FILE;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data/config dirs.
pub const APP_DIR: &str = "taches";

/// Config file name.
pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the database path.
pub const DB_ENV_VAR: &str = "TACHES_DB";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Ask before destructive commands (delete, reset, seed)
    pub confirmations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: data_dir().join(DB_FILE),
            confirmations: true,
        }
    }
}

impl Config {
    /// Load from the default config file location plus environment.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                let mut config = Self::default();
                config.apply_env(|key| std::env::var(key).ok());
                Ok(config)
            }
        }
    }

    /// Load from `path` (defaults if it does not exist) plus environment.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = Self::from_yaml(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
            config
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse YAML; missing keys keep their defaults.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).context("Invalid config YAML")
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db) = lookup(DB_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            log::debug!("{} overrides database path: {}", DB_ENV_VAR, db);
            self.db_path = PathBuf::from(db);
        }
    }
}

/// Per-user data directory for taches (database, logs).
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of the user config file, if the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
