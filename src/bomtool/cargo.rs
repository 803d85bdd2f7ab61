//! cargo detector: Cargo.toml manifests

use super::npm::directory_name;
use super::{CodeLocation, Detector, DetectorId, Extraction, ToolType};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use std::path::Path;
use toml::Value;

pub const CARGO_TOML: DetectorId = DetectorId("cargo-toml");

const MANIFEST: &str = "Cargo.toml";

/// Detects Rust projects by their `Cargo.toml` and extracts the declared
/// `[dependencies]` and `[dev-dependencies]`.
pub struct CargoDetector;

impl Detector for CargoDetector {
    fn id(&self) -> DetectorId {
        CARGO_TOML
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Cargo
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(MANIFEST).is_file()
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let manifest_path = directory.join(MANIFEST);
        let content = match std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let manifest: Value = match content.parse() {
            Ok(value) => value,
            Err(err) => {
                return Extraction::failure(format!(
                    "malformed Cargo.toml at {}: {}",
                    manifest_path.display(),
                    err
                ))
            }
        };

        let package = manifest.get("package");
        let name = package
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_else(|| directory_name(directory));
        let version = package.and_then(|p| p.get("version")).and_then(Value::as_str);

        let mut graph = DependencyGraph::new();
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(deps) = manifest.get(section).and_then(Value::as_table) {
                for (dep_name, spec) in deps {
                    let dep_version = dependency_version(spec);
                    let id = ExternalId::name_version(Forge::CRATES, dep_name, dep_version);
                    graph.add_root(DependencyNode::new(id));
                }
            }
        }

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::Cargo,
            external_id: ExternalId::name_version(Forge::CRATES, name, version),
            graph,
        }])
    }
}

/// A dependency spec is either a bare version string or a table with an
/// optional `version` key (path/git dependencies have none).
fn dependency_version(spec: &Value) -> Option<&str> {
    match spec {
        Value::String(version) => Some(version),
        Value::Table(table) => table.get("version").and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bomtool::ExtractionOutcome;
    use tempfile::TempDir;

    #[test]
    fn test_extract_dependency_tables() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "svc"
version = "0.3.1"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
local-helper = { path = "../helper" }

[dev-dependencies]
tempfile = "3.8"
"#,
        )
        .unwrap();

        let extraction = CargoDetector.extract(dir.path());
        assert_eq!(extraction.outcome, ExtractionOutcome::Success);

        let location = &extraction.code_locations[0];
        assert_eq!(location.external_id.name(), Some("svc"));
        assert_eq!(location.external_id.version(), Some("0.3.1"));
        assert_eq!(location.graph.len(), 3);
        assert!(location.graph.contains(&ExternalId::name_version(
            Forge::CRATES,
            "serde",
            Some("1.0")
        )));
        // path dependency keeps its name, just without a version piece
        assert!(location.graph.contains(&ExternalId::name_version(
            Forge::CRATES,
            "local-helper",
            None
        )));
    }

    #[test]
    fn test_malformed_manifest_is_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package\nbroken").unwrap();

        let extraction = CargoDetector.extract(dir.path());
        assert_eq!(extraction.outcome, ExtractionOutcome::Failure);
    }
}
