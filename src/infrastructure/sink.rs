//! Artifact writer.
//!
//! Artifacts are named `{user_id}_export.{ext}` inside the output directory.
//! An existing artifact for the same user and format is overwritten.

use std::fs;
use std::path::PathBuf;

use crate::application::ExportFormat;
use crate::domain::{AppError, Result};

/// Writes rendered exports to disk.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    output_dir: PathBuf,
}

impl ArtifactSink {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Path the artifact for `user_id` in `format` is written to.
    #[must_use]
    pub fn artifact_path(&self, user_id: &str, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{user_id}_export.{}", format.extension()))
    }

    /// Write an artifact, replacing any earlier one.
    ///
    /// The write is not atomic: a crash mid-write can leave a partial file.
    ///
    /// # Errors
    /// Returns `AppError::Io` naming the path if the write fails, and
    /// `AppError::NotImplemented` for Excel, which has no artifact.
    pub fn write_artifact(
        &self,
        user_id: &str,
        format: ExportFormat,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        if format == ExportFormat::Excel {
            return Err(AppError::NotImplemented {
                feature: "Excel export",
            });
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::io(
                format!(
                    "Failed to create output directory {}",
                    self.output_dir.display()
                ),
                e,
            )
        })?;

        let path = self.artifact_path(user_id, format);
        fs::write(&path, bytes)
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote {format} artifact");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_name() {
        let sink = ArtifactSink::new("/out");
        assert_eq!(
            sink.artifact_path("10001", ExportFormat::Json),
            PathBuf::from("/out/10001_export.json")
        );
        assert_eq!(
            sink.artifact_path("10001", ExportFormat::Html),
            PathBuf::from("/out/10001_export.html")
        );
    }

    #[test]
    fn test_write_overwrites_previous_artifact() {
        let dir = tempdir().unwrap();
        let sink = ArtifactSink::new(dir.path());

        sink.write_artifact("10001", ExportFormat::Json, b"first export, longer")
            .unwrap();
        let path = sink
            .write_artifact("10001", ExportFormat::Json, b"second")
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_creates_output_dir() {
        let dir = tempdir().unwrap();
        let sink = ArtifactSink::new(dir.path().join("nested").join("exports"));

        let path = sink
            .write_artifact("10001", ExportFormat::Html, b"<html></html>")
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_excel_artifact_is_refused() {
        let dir = tempdir().unwrap();
        let sink = ArtifactSink::new(dir.path().join("exports"));

        let err = sink
            .write_artifact("10001", ExportFormat::Excel, b"PK")
            .unwrap_err();
        assert!(matches!(err, AppError::NotImplemented { .. }));
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn test_write_failure_names_path() {
        let dir = tempdir().unwrap();
        // a file where the output directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let sink = ArtifactSink::new(&blocker);

        let err = sink
            .write_artifact("10001", ExportFormat::Json, b"{}")
            .unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(err.to_string().contains("blocker"));
    }
}
