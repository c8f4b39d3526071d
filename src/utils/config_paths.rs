//! User configuration
//!
//! Optional defaults live in `~/.pgtree/config.json`. Every key is optional
//! and command line flags always win over the file.

use crate::error::{PgtreeError, PgtreeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_DIRECTORY: &str = ".pgtree";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// User configuration (read from config.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Show command lines by default
    #[serde(default)]
    pub show_arguments: Option<bool>,
    /// Show thread names by default
    #[serde(default)]
    pub show_long_names: Option<bool>,
    /// Match names exactly instead of by substring
    #[serde(default)]
    pub exact: Option<bool>,
    /// Log filter, same syntax as RUST_LOG
    #[serde(default)]
    pub log_level: Option<String>,
}

impl UserConfig {
    /// Load a config file. A missing file is `Ok(None)`.
    pub fn load(config_file: &Path) -> PgtreeResult<Option<Self>> {
        if !config_file.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_file).map_err(|err| {
            PgtreeError::config_with_source(
                format!("cannot read {}", config_file.display()),
                err,
            )
        })?;
        let config = serde_json::from_str(&content).map_err(|err| {
            PgtreeError::config_with_source(
                format!("invalid config file {}: {}", config_file.display(), err),
                err,
            )
        })?;
        Ok(Some(config))
    }

    pub fn show_arguments(&self) -> bool {
        self.show_arguments.unwrap_or(true)
    }

    pub fn show_long_names(&self) -> bool {
        self.show_long_names.unwrap_or(true)
    }

    pub fn exact(&self) -> bool {
        self.exact.unwrap_or(false)
    }
}

/// Default location of the config file, if a home directory exists
pub fn default_config_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIRECTORY).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = UserConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "show_arguments": false }"#).unwrap();

        let config = UserConfig::load(&path).unwrap().unwrap();
        assert!(!config.show_arguments());
        assert!(config.show_long_names());
        assert!(!config.exact());
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = UserConfig::load(&path).unwrap_err();
        assert!(matches!(err, PgtreeError::Config { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "show_cpu": true }"#).unwrap();

        assert!(UserConfig::load(&path).is_err());
    }
}
