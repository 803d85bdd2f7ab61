//! Document file output

use super::ScanDocument;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Output-write faults are fatal, user-facing errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not serialize document '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write document to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes one file per document into the configured output directory,
/// replacing any pre-existing file at the target path.
pub struct OutputWriter {
    output_directory: PathBuf,
}

impl OutputWriter {
    pub fn new(output_directory: &Path) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
        }
    }

    pub fn write(&self, file_name: &str, document: &ScanDocument) -> Result<PathBuf, DocumentError> {
        // Serialize fully before touching the filesystem so a cancelled or
        // failed run never leaves a half-written document.
        let body =
            serde_json::to_string_pretty(document).map_err(|source| DocumentError::Serialize {
                name: document.code_location_name.clone(),
                source,
            })?;

        std::fs::create_dir_all(&self.output_directory).map_err(|source| DocumentError::Io {
            path: self.output_directory.clone(),
            source,
        })?;

        let target = self.output_directory.join(file_name);
        if target.exists() {
            std::fs::remove_file(&target).map_err(|source| DocumentError::Io {
                path: target.clone(),
                source,
            })?;
            debug!(path = %target.display(), "Removed pre-existing document");
        }

        std::fs::write(&target, body).map_err(|source| DocumentError::Io {
            path: target.clone(),
            source,
        })?;
        info!(path = %target.display(), "Document generated");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyGraph, ExternalId, Forge};
    use tempfile::TempDir;

    fn document(name: &str) -> ScanDocument {
        ScanDocument::new(
            name.to_string(),
            "acme",
            Some("1.0"),
            ExternalId::name_version(Forge::ROOT, "acme", Some("1.0")),
            DependencyGraph::new(),
        )
    }

    #[test]
    fn test_write_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(&dir.path().join("out/nested"));

        let path = writer.write("doc.bdio.json", &document("acme bom")).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_overwrite_replaces_stale_content() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path());

        std::fs::write(dir.path().join("doc.bdio.json"), "stale content").unwrap();

        let path = writer.write("doc.bdio.json", &document("acme bom")).unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        assert!(!body.contains("stale content"));
        assert!(body.contains("acme bom"));
    }

    #[test]
    fn test_written_document_is_valid_json() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path());

        let path = writer.write("doc.bdio.json", &document("acme bom")).unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["project_name"], "acme");
        assert_eq!(value["code_location_name"], "acme bom");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_surfaced() {
        let writer = OutputWriter::new(Path::new("/proc/bomscan-denied"));
        let result = writer.write("doc.bdio.json", &document("acme bom"));
        assert!(matches!(result, Err(DocumentError::Io { .. })));
    }
}
