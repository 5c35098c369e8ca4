//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod archive_db;
pub mod config;
pub mod sink;

pub use archive_db::ArchiveDb;
pub use config::{config_to_toml, ensure_config_exists, load_config, load_config_from_file};
pub use sink::ArtifactSink;
