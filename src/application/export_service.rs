//! Export use case.
//!
//! One export call assembles the document, renders it in the requested
//! format and writes the artifact. Any failure stops that format's artifact.

use std::path::PathBuf;

use crate::domain::{ExportDocument, Result};
use crate::infrastructure::ArtifactSink;

use super::aggregator::ExportAggregator;
use super::formatter::ExportFormat;
use super::html_report::HtmlRenderer;

/// Runs exports for a user against a sink.
pub struct ExportService<'a> {
    aggregator: ExportAggregator<'a>,
    html: HtmlRenderer,
    sink: ArtifactSink,
}

impl<'a> ExportService<'a> {
    #[must_use]
    pub const fn new(
        aggregator: ExportAggregator<'a>,
        html: HtmlRenderer,
        sink: ArtifactSink,
    ) -> Self {
        Self {
            aggregator,
            html,
            sink,
        }
    }

    /// Export one format and return the written path.
    ///
    /// # Errors
    /// Returns error if fetching, rendering or writing fails.
    pub fn export(&self, user_id: &str, format: ExportFormat) -> Result<PathBuf> {
        let doc = self.aggregator.assemble(user_id)?;
        self.write(&doc, format)
    }

    /// Export several formats from a single fetch.
    ///
    /// Every format is attempted in order and reports its own outcome, so a
    /// failing format leaves the others' artifacts in place.
    ///
    /// # Errors
    /// Returns error if fetching fails; no format is attempted then.
    pub fn export_many(
        &self,
        user_id: &str,
        formats: &[ExportFormat],
    ) -> Result<Vec<(ExportFormat, Result<PathBuf>)>> {
        let doc = self.aggregator.assemble(user_id)?;
        let outcomes = formats
            .iter()
            .map(|&format| {
                let outcome = self.write(&doc, format);
                if let Err(e) = &outcome {
                    tracing::warn!(user = user_id, %format, error = %e, "Export format failed");
                }
                (format, outcome)
            })
            .collect();
        Ok(outcomes)
    }

    /// Assemble the document without writing anything.
    ///
    /// # Errors
    /// Returns error if fetching fails.
    pub fn preview(&self, user_id: &str) -> Result<ExportDocument> {
        self.aggregator.assemble(user_id)
    }

    fn write(&self, doc: &ExportDocument, format: ExportFormat) -> Result<PathBuf> {
        tracing::info!(user = doc.user_id(), %format, "Rendering export");
        let bytes = format.render(doc, &self.html)?;
        self.sink.write_artifact(doc.user_id(), format, &bytes)
    }
}
