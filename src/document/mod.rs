//! Output document model and naming
//!
//! The document is the serialized form of one dependency graph plus
//! project metadata. Non-aggregate runs produce one document per code
//! location; aggregate runs produce exactly one for the whole project.

mod writer;

pub use writer::{DocumentError, OutputWriter};

use crate::bomtool::{CodeLocation, ToolType};
use crate::graph::{DependencyGraph, ExternalId};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

pub const DOCUMENT_EXTENSION: &str = "bdio.json";

/// Serialized bill-of-materials document.
#[derive(Debug, Clone, Serialize)]
pub struct ScanDocument {
    pub code_location_name: String,
    pub project_name: String,
    pub project_version: Option<String>,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub external_id: ExternalId,
    pub graph: DependencyGraph,
}

impl ScanDocument {
    pub fn new(
        code_location_name: String,
        project_name: &str,
        project_version: Option<&str>,
        external_id: ExternalId,
        graph: DependencyGraph,
    ) -> Self {
        Self {
            code_location_name,
            project_name: project_name.to_string(),
            project_version: project_version.map(str::to_string),
            creator: format!("{}/{}", crate::NAME, crate::VERSION),
            created_at: Utc::now(),
            external_id,
            graph,
        }
    }
}

/// Replaces every character that is unsafe in a file name or URI with an
/// underscore. Deterministic for a given input.
pub fn escape_for_uri(value: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9\-.]").expect("static regex"));
    unsafe_chars.replace_all(value, "_").into_owned()
}

/// Deterministic file name for a single code location's document.
pub fn code_location_file_name(
    project_name: &str,
    source_root: &Path,
    location: &CodeLocation,
) -> String {
    let relative = location
        .source_path
        .strip_prefix(source_root)
        .unwrap_or(&location.source_path)
        .to_string_lossy()
        .replace('\\', "/");
    let base = if relative.is_empty() {
        format!("{}_{}", project_name, location.tool_type)
    } else {
        format!("{}_{}_{}", project_name, relative, location.tool_type)
    };
    format!("{}.{}", escape_for_uri(&base), DOCUMENT_EXTENSION)
}

/// Deterministic, human-readable code location name.
pub fn code_location_name(
    project_name: &str,
    project_version: Option<&str>,
    tool_type: ToolType,
) -> String {
    match project_version {
        Some(version) => format!("{}/{} {} bom", project_name, version, tool_type),
        None => format!("{} {} bom", project_name, tool_type),
    }
}

/// File name for the single aggregate document.
pub fn aggregate_file_name(aggregate_name: &str) -> String {
    format!("{}.{}", escape_for_uri(aggregate_name), DOCUMENT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Forge;
    use std::path::PathBuf;

    #[test]
    fn test_escape_for_uri() {
        assert_eq!(escape_for_uri("my project/1.0"), "my_project_1.0");
        assert_eq!(escape_for_uri("clean-name.2"), "clean-name.2");
    }

    #[test]
    fn test_aggregate_file_name() {
        assert_eq!(
            aggregate_file_name("acme all projects"),
            "acme_all_projects.bdio.json"
        );
    }

    #[test]
    fn test_code_location_file_name_is_deterministic() {
        let location = CodeLocation {
            source_path: PathBuf::from("/proj/services/api"),
            tool_type: ToolType::Npm,
            external_id: ExternalId::name_version(Forge::NPMJS, "api", None),
            graph: DependencyGraph::new(),
        };
        let first = code_location_file_name("acme", Path::new("/proj"), &location);
        let second = code_location_file_name("acme", Path::new("/proj"), &location);
        assert_eq!(first, second);
        assert_eq!(first, "acme_services_api_NPM.bdio.json");
    }

    #[test]
    fn test_code_location_file_name_at_root() {
        let location = CodeLocation {
            source_path: PathBuf::from("/proj"),
            tool_type: ToolType::Cargo,
            external_id: ExternalId::name_version(Forge::CRATES, "proj", None),
            graph: DependencyGraph::new(),
        };
        assert_eq!(
            code_location_file_name("acme", Path::new("/proj"), &location),
            "acme_CARGO.bdio.json"
        );
    }

    #[test]
    fn test_code_location_name() {
        assert_eq!(
            code_location_name("acme", Some("1.0"), ToolType::Maven),
            "acme/1.0 MAVEN bom"
        );
        assert_eq!(code_location_name("acme", None, ToolType::Pip), "acme PIP bom");
    }
}
