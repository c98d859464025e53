//! Loading `~/.mapkeeper/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.mapkeeper/config.ini).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

/// Get the path to the config directory (~/.mapkeeper).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mapkeeper")
}

/// Get the path to the config file (~/.mapkeeper/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config.catalog.regions_file.is_none());
        assert!(config.catalog.state_file.is_none());
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(config.logging.directory.ends_with("logs"));
        assert_eq!(config.layout.verify_invariants, cfg!(debug_assertions));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(
            &config_path,
            r#"
[catalog]
regions_file = /srv/maps/regions.json

[logging]
level = mapkeeper=debug

[layout]
verify_invariants = off
"#,
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(
            config.catalog.regions_file,
            Some(PathBuf::from("/srv/maps/regions.json"))
        );
        assert!(config.catalog.state_file.is_none());
        assert_eq!(config.logging.level, "mapkeeper=debug");
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
        assert!(!config.layout.verify_invariants);
        assert!(!config.layout_config().verify_invariants);
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".mapkeeper/config.ini"));
    }
}
