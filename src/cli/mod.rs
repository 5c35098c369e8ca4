//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::ExportFormat;
use crate::domain::{Locale, SourceErrorPolicy};

/// QZone history export - dump an archived user's moments, guestbook and friends.
#[derive(Parser, Debug)]
#[command(name = "qzone-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.qzone-history/config.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Archive database to read (overrides the configuration).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a user's archive to files named `<user>_export.<ext>`.
    Export {
        /// QQ number of the user to export.
        user: String,

        /// Output format: json, html or excel (repeatable).
        #[arg(short, long = "format", default_value = "json")]
        formats: Vec<String>,

        /// Output directory (overrides the configuration).
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// What to do when a source fails: abort or skip.
        #[arg(long)]
        on_source_error: Option<String>,

        /// HTML report language: zh-CN or en.
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show how many records the archive holds for a user.
    Summary {
        /// QQ number of the user.
        user: String,
    },

    /// Show the configuration and database paths being used.
    Paths,

    /// Print the effective configuration as TOML.
    Config,

    /// Write a default configuration file if none exists.
    InitConfig,
}

/// Parse a list of format names.
pub fn parse_formats(names: &[String]) -> Result<Vec<ExportFormat>, String> {
    names.iter().map(|n| n.parse::<ExportFormat>()).collect()
}

/// Parse an optional policy argument.
pub fn parse_policy(value: Option<&str>) -> Result<Option<SourceErrorPolicy>, String> {
    value.map(str::parse::<SourceErrorPolicy>).transpose()
}

/// Parse an optional locale argument.
pub fn parse_locale(value: Option<&str>) -> Result<Option<Locale>, String> {
    value.map(str::parse::<Locale>).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_command() {
        let cli = Cli::try_parse_from([
            "qzone-export",
            "-vv",
            "export",
            "10001",
            "-f",
            "json",
            "-f",
            "html",
            "-o",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Export {
                user,
                formats,
                out_dir,
                ..
            } => {
                assert_eq!(user, "10001");
                assert_eq!(
                    parse_formats(&formats).unwrap(),
                    [ExportFormat::Json, ExportFormat::Html]
                );
                assert_eq!(out_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_format_is_json() {
        let cli = Cli::try_parse_from(["qzone-export", "export", "10001"]).unwrap();
        let Commands::Export { formats, .. } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(parse_formats(&formats).unwrap(), [ExportFormat::Json]);
    }

    #[test]
    fn test_invalid_options() {
        assert!(parse_formats(&["pdf".to_string()]).is_err());
        assert!(parse_policy(Some("retry")).is_err());
        assert_eq!(parse_policy(None), Ok(None));
        assert_eq!(parse_locale(Some("en")), Ok(Some(Locale::En)));
    }
}
