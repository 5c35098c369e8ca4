//! Domain-level error types for qzone-history-export.
//!
//! All errors are typed with `thiserror` and carry enough context to
//! identify the failing stage (source, format or file path).

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
///
/// There is no template-parse variant: askama compiles `templates/export.html`
/// into the binary, so a malformed template fails the build instead of an
/// export. Substitution failures at render time are `Render`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A record source failed while fetching a user's records.
    #[error("Failed to load {source_name} for user {user_id}: {inner}")]
    SourceFetch {
        source_name: &'static str,
        user_id: String,
        #[source]
        inner: Box<AppError>,
    },

    /// Archive database file not found at expected location.
    #[error("Archive database not found at: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Failed to open or query the archive database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Invalid or corrupted data in the archive.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON encoding of the export document failed.
    #[error("Failed to encode {what} as JSON: {message}")]
    Serialization {
        what: &'static str,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// HTML template substitution failed.
    #[error("Failed to render HTML export: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<askama::Error>,
    },

    /// Some formats of a multi-format export failed; the rest were written.
    #[error("{failed} of {total} export formats failed")]
    ExportIncomplete { failed: usize, total: usize },

    /// The requested export format has no implementation.
    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Wrap a source failure with the name of the source and the user.
    pub fn source_fetch(source_name: &'static str, user_id: &str, err: Self) -> Self {
        Self::SourceFetch {
            source_name,
            user_id: user_id.to_string(),
            inner: Box::new(err),
        }
    }

    /// Create a serialization error.
    pub fn serialization(what: &'static str, err: serde_json::Error) -> Self {
        Self::Serialization {
            what,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a render error from an askama error.
    pub fn render(err: askama::Error) -> Self {
        Self::Render {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
