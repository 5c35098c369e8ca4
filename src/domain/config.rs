//! Application configuration.
//!
//! Loaded from `~/.qzone-history/config.toml` when present; every field
//! has a default so a missing file or section is not an error.

use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// What an export does when one of the record sources fails.
///
/// The same policy applies to every output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceErrorPolicy {
    /// Abort the export and report which source failed.
    #[default]
    Abort,
    /// Log a warning and export the failed source as empty.
    Skip,
}

impl std::str::FromStr for SourceErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(format!("Unknown source error policy: {s}. Use: abort, skip")),
        }
    }
}

/// Language of the HTML report labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// Value for the `lang` attribute of the HTML document.
    #[must_use]
    pub const fn html_lang(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::En => "en",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh-cn" | "zh" => Ok(Self::ZhCn),
            "en" | "en-us" => Ok(Self::En),
            _ => Err(format!("Unknown locale: {s}. Use: zh-CN, en")),
        }
    }
}

/// Archive database location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchiveConfig {
    /// Path to the archive database (defaults to `<data_dir>/archive.db`).
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Export behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory artifacts are written to (defaults to the working directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub on_source_error: SourceErrorPolicy,

    #[serde(default)]
    pub locale: Locale,

    /// Offset from UTC used when formatting timestamps, in minutes.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            on_source_error: SourceErrorPolicy::default(),
            locale: Locale::default(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

const fn default_utc_offset_minutes() -> i32 {
    480 // UTC+8
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".qzone-history")
    }

    /// Get the archive database path.
    #[must_use]
    pub fn archive_db_path(&self) -> PathBuf {
        self.archive
            .db_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("archive.db"))
    }

    /// Get the artifact output directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Offset used for displayed times; out-of-range values fall back to UTC.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        self.export
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    minutes = self.export.utc_offset_minutes,
                    "UTC offset out of range, using UTC"
                );
                Utc.fix()
            })
    }
}
