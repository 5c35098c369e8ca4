//! QZone History Export - dump an archived user's social history.
//!
//! Reads the archive database written by the scraper and produces
//! `<user>_export.json` and/or `<user>_export.html` artifacts.
//!
//! Usage:
//!   qzone-export export 10001 -f json -f html   # Both artifacts
//!   qzone-export summary 10001                  # Record counts
//!   qzone-export paths                          # Where things are read from

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{format_summary, ExportAggregator, ExportService, HtmlOptions, HtmlRenderer};
use cli::{parse_formats, parse_locale, parse_policy, Cli, Commands};
use domain::{AppConfig, AppError};
use infrastructure::{
    config_to_toml, ensure_config_exists, load_config, load_config_from_file, ArchiveDb,
    ArtifactSink,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => load_config()?,
    };
    if let Some(db) = cli.db {
        config.archive.db_path = Some(db);
    }

    match cli.command {
        Commands::Export {
            user,
            formats,
            out_dir,
            on_source_error,
            locale,
        } => {
            let formats = parse_formats(&formats).map_err(config_error)?;
            if let Some(policy) = parse_policy(on_source_error.as_deref()).map_err(config_error)? {
                config.export.on_source_error = policy;
            }
            if let Some(locale) = parse_locale(locale.as_deref()).map_err(config_error)? {
                config.export.locale = locale;
            }
            if let Some(dir) = out_dir {
                config.export.output_dir = Some(dir);
            }
            cmd_export(&config, &user, &formats)?;
        }
        Commands::Summary { user } => {
            cmd_summary(&config, &user)?;
        }
        Commands::Paths => {
            cmd_paths(&config);
        }
        Commands::Config => {
            println!("{}", config_to_toml(&config)?);
        }
        Commands::InitConfig => {
            cmd_init_config()?;
        }
    }

    Ok(())
}

fn config_error(message: String) -> AppError {
    AppError::Config { message }
}

/// Export command.
fn cmd_export(
    config: &AppConfig,
    user: &str,
    formats: &[application::ExportFormat],
) -> domain::Result<()> {
    let db = ArchiveDb::open(&config.archive_db_path())?;
    let service = build_service(config, &db);

    let outcomes = match formats {
        [format] => vec![(*format, service.export(user, *format))],
        many => service.export_many(user, many)?,
    };

    let total = outcomes.len();
    let mut failed = 0;
    for (format, outcome) in outcomes {
        match outcome {
            Ok(path) => println!("{} {}", "✓".green().bold(), path.display()),
            Err(e) if total == 1 => return Err(e),
            Err(e) => {
                failed += 1;
                eprintln!("{} {format}: {e}", "✗".red().bold());
            }
        }
    }

    if failed > 0 {
        return Err(AppError::ExportIncomplete { failed, total });
    }

    Ok(())
}

/// Summary command.
fn cmd_summary(config: &AppConfig, user: &str) -> domain::Result<()> {
    let db = ArchiveDb::open(&config.archive_db_path())?;
    let doc = build_service(config, &db).preview(user)?;

    println!("{}", format_summary(doc.user_id(), &doc.summary()));

    Ok(())
}

/// Wire the archive, renderer and sink according to the configuration.
fn build_service<'a>(config: &AppConfig, db: &'a ArchiveDb) -> ExportService<'a> {
    ExportService::new(
        ExportAggregator::new(db, db, db, config.export.on_source_error),
        HtmlRenderer::new(HtmlOptions::from_config(config)),
        ArtifactSink::new(config.output_dir()),
    )
}

/// Show paths command.
fn cmd_paths(config: &AppConfig) {
    let db_path = config.archive_db_path();
    let db_status = if db_path.exists() {
        "found".green()
    } else {
        "missing".red()
    };

    println!("{}", "📂 QZone Export Paths".bold());
    println!();
    println!("  Config:   {}", AppConfig::config_file_path().display());
    println!("  Archive:  {} [{}]", db_path.display(), db_status);
    println!("  Output:   {}", config.output_dir().display());
}

/// Write the default configuration file.
fn cmd_init_config() -> domain::Result<()> {
    let (path, created) = ensure_config_exists()?;
    if created {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
