//! Domain layer - core types, errors and source contracts.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (DB, IO, etc.).

pub mod config;
pub mod error;
pub mod models;
pub mod sources;

pub use config::{AppConfig, Locale, SourceErrorPolicy};
pub use error::{AppError, Result};
pub use models::{
    format_time, resolve_display_time, Comment, ExportDocument, ExportSummary, Friend,
    GuestbookMessage, TimelinePost,
};
pub use sources::{FriendSource, GuestbookSource, TimelineSource};
