//! Application layer - use cases and orchestration.
//!
//! This layer assembles export documents from the record sources and
//! renders them into artifacts.

pub mod aggregator;
pub mod export_service;
pub mod formatter;
pub mod html_report;

pub use aggregator::ExportAggregator;
pub use export_service::ExportService;
pub use formatter::{format_summary, ExportFormat};
pub use html_report::{HtmlOptions, HtmlRenderer};
