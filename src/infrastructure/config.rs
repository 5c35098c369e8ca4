//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# QZone history export configuration
# Auto-generated - edit as needed

[archive]
# Archive database written by the scraper (defaults to ~/.qzone-history/archive.db)
# db_path = "/custom/path/archive.db"

[export]
# Directory artifacts are written to (defaults to the working directory)
# output_dir = "exports"

# What to do when a record source fails: "abort" or "skip"
on_source_error = "abort"

# HTML report language: "zh-CN" or "en"
locale = "zh-CN"

# Offset from UTC for displayed times, in minutes (480 = UTC+8)
utc_offset_minutes = 480
"#;

/// Load configuration from the default location, or defaults if absent.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = AppConfig::config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    let config = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file {}: {e}", path.display()),
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration");

    Ok(config)
}

/// Serialize configuration as TOML.
///
/// # Errors
/// Returns error if the configuration cannot be serialized.
pub fn config_to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })
}

/// Create the default configuration file if it doesn't exist.
///
/// Returns the config path and whether it was newly created.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<(PathBuf, bool)> {
    let config_path = AppConfig::config_file_path();

    if config_path.exists() {
        return Ok((config_path, false));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %config_path.display(), "Created default configuration");

    Ok((config_path, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Locale, SourceErrorPolicy};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.export.on_source_error, SourceErrorPolicy::Abort);
        assert_eq!(config.export.locale, Locale::ZhCn);
        assert_eq!(config.export.utc_offset_minutes, 480);
        assert!(config.archive.db_path.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[export]\non_source_error = \"skip\"\n").unwrap();
        assert_eq!(config.export.on_source_error, SourceErrorPolicy::Skip);
        assert_eq!(config.export.utc_offset_minutes, 480);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.export.locale = Locale::En;
        config.export.output_dir = Some(dir.path().join("out"));

        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::write(&config_path, config_to_toml(&config).unwrap()).unwrap();
        let loaded = load_config_from_file(&config_path).unwrap();

        assert_eq!(loaded.export.locale, Locale::En);
        assert_eq!(loaded.export.output_dir, config.export.output_dir);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[export]\nlocale = \"fr\"\n").unwrap();

        let err = load_config_from_file(&config_path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
