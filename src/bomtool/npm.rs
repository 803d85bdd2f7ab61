//! npm detector: package.json manifests

use super::{
    CodeLocation, Detector, DetectorId, Extraction, ToolType,
};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

pub const NPM_PACKAGE_JSON: DetectorId = DetectorId("npm-package-json");

const PACKAGE_JSON: &str = "package.json";

/// Detects npm projects by their `package.json` and extracts the declared
/// direct dependencies (`dependencies` + `devDependencies`).
pub struct NpmPackageJsonDetector;

impl Detector for NpmPackageJsonDetector {
    fn id(&self) -> DetectorId {
        NPM_PACKAGE_JSON
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Npm
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(PACKAGE_JSON).is_file()
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let manifest_path = directory.join(PACKAGE_JSON);
        let content = match std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let manifest: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                return Extraction::failure(format!(
                    "malformed package.json at {}: {}",
                    manifest_path.display(),
                    err
                ))
            }
        };

        let name = manifest
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_else(|| directory_name(directory));
        let version = manifest.get("version").and_then(Value::as_str);

        let mut graph = DependencyGraph::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(deps) = manifest.get(section).and_then(Value::as_object) {
                for (dep_name, dep_version) in deps {
                    let id = ExternalId::name_version(
                        Forge::NPMJS,
                        dep_name,
                        dep_version.as_str(),
                    );
                    graph.add_root(DependencyNode::new(id));
                }
            }
        }

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::Npm,
            external_id: ExternalId::name_version(Forge::NPMJS, name, version),
            graph,
        }])
    }
}

pub(crate) fn directory_name(directory: &Path) -> &str {
    directory
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
}
