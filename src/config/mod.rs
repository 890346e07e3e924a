//! Configuration management for roster
//!
//! Handles the ~/.roster/ directory structure and config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::SortKey;

/// Local storage key the roster has always been saved under
pub const DEFAULT_STORAGE_KEY: &str = "employees_data";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Initial sort mode; an unrecognized value leaves rows in stored order
    #[serde(default = "default_sort")]
    pub default_sort: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_sort() -> String {
    SortKey::Id.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_sort: default_sort(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn sort_key(&self) -> Option<SortKey> {
        self.default_sort.parse().ok()
    }
}

/// Returns the path to the roster home directory
///
/// `ROSTER_HOME` takes precedence over `~/.roster`.
pub fn roster_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("ROSTER_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".roster"))
}

/// Returns paths to all roster directories
#[derive(Debug, Clone)]
pub struct RosterPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub db: PathBuf,
    pub db_file: PathBuf,
    pub logs: PathBuf,
    pub log_file: PathBuf,
}

impl RosterPaths {
    pub fn new() -> Result<Self> {
        Ok(Self::at(roster_home()?))
    }

    /// Lay out the roster directories under an explicit root
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join("config.toml"),
            db: root.join("db"),
            db_file: root.join("db/roster.db"),
            logs: root.join("logs"),
            log_file: root.join("logs/roster.log"),
            root,
        }
    }

    /// Create all directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create roster root")?;
        fs::create_dir_all(&self.db).context("Failed to create db directory")?;
        fs::create_dir_all(&self.logs).context("Failed to create logs directory")?;
        Ok(())
    }

    /// Check if roster has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config.exists() && self.db_file.exists()
    }
}

/// Load configuration from disk, falling back to defaults when absent
pub fn load_config(paths: &RosterPaths) -> Result<Config> {
    if !paths.config.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&paths.config).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to disk
pub fn save_config(paths: &RosterPaths, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config, content).context("Failed to write config.toml")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());
        let config = load_config(&paths).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "employees_data");
        assert_eq!(config.sort_key(), Some(SortKey::Id));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("default_sort = \"name\"").unwrap();
        assert_eq!(config.sort_key(), Some(SortKey::Name));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_sort_means_no_reordering() {
        let config: Config = toml::from_str("default_sort = \"salary\"").unwrap();
        assert_eq!(config.sort_key(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RosterPaths::at(dir.path());
        paths.ensure_dirs().unwrap();

        let config = Config {
            storage_key: "staff".to_string(),
            default_sort: "address".to_string(),
            log_level: "debug".to_string(),
        };
        save_config(&paths, &config).unwrap();

        assert_eq!(load_config(&paths).unwrap(), config);
    }
}
