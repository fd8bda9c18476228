//! Configuration file support.
//!
//! # Configuration File Format
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//! max_attempts = 5
//! backoff_initial_ms = 100
//!
//! [crawl]
//! concurrency = 10
//! default_max_results = 100
//! page_delay_min_ms = 1000
//! page_delay_max_ms = 3000
//! error_backoff_ms = 5000
//! # max_page_failures = 20
//!
//! [[summary.extra_keywords]]
//! term = "nanobody"
//! phrase = "single-domain antibody work"
//! ```
//!
//! Lookup order for [`find_config_file`]: `./antibody-leads.toml`, then
//! `<config dir>/antibody-leads/config.toml`.

use std::path::{Path, PathBuf};

use super::Config;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "antibody-leads.toml";

/// Locate a configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("antibody-leads").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Read a TOML configuration file without environment overrides
pub fn read_config_file(path: &Path) -> Result<Config, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Save configuration to a TOML file, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.crawl.concurrency = 3;
        config.crawl.max_page_failures = Some(7);

        save_config(&config, &path).unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(matches!(
            read_config_file(&path),
            Err(ConfigFileError::Io(_))
        ));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(matches!(
            read_config_file(&path),
            Err(ConfigFileError::Parse(_))
        ));
    }
}
