//! Server Configuration
//!
//! Read from a TOML file; every field has a default so an empty file works.

use board_dnd::RenderOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// Directory for log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub max_log_files: usize,
    pub render_order: RenderOrder,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("taskboard.db"),
            log_dir: None,
            log_level: "info".to_string(),
            max_log_files: 5,
            render_order: RenderOrder::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults with a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.render_order, RenderOrder::Descending);
    }

    #[test]
    fn test_partial_config() {
        let config = ServerConfig::from_toml_str(
            r#"
            db_path = "/tmp/board.db"
            render_order = "ascending"
            max_log_files = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/board.db"));
        assert_eq!(config.render_order, RenderOrder::Ascending);
        assert_eq!(config.max_log_files, 2);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_render_order() {
        assert!(ServerConfig::from_toml_str("render_order = \"sideways\"").is_err());
    }
}
