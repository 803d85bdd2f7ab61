//! go modules detector: go.mod manifests

use super::npm::directory_name;
use super::{CodeLocation, Detector, DetectorId, Extraction, ToolType};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use std::path::Path;

pub const GO_MOD: DetectorId = DetectorId("go-mod");

const MANIFEST: &str = "go.mod";

/// Detects Go module projects and extracts the `require` directives.
pub struct GoModDetector;

impl Detector for GoModDetector {
    fn id(&self) -> DetectorId {
        GO_MOD
    }

    fn tool_type(&self) -> ToolType {
        ToolType::GoMod
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(MANIFEST).is_file()
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let mod_path = directory.join(MANIFEST);
        let content = match std::fs::read_to_string(&mod_path)
            .with_context(|| format!("failed to read {}", mod_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let mut module_name = None;
        let mut graph = DependencyGraph::new();
        let mut in_require_block = false;

        for line in content.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix("module ") {
                module_name = Some(name.trim().to_string());
            } else if line == "require (" {
                in_require_block = true;
            } else if in_require_block && line == ")" {
                in_require_block = false;
            } else if in_require_block {
                add_requirement(&mut graph, line);
            } else if let Some(rest) = line.strip_prefix("require ") {
                add_requirement(&mut graph, rest);
            }
        }

        let name = module_name.unwrap_or_else(|| directory_name(directory).to_string());

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::GoMod,
            external_id: ExternalId::name_version(Forge::GOLANG, &name, None),
            graph,
        }])
    }
}

fn add_requirement(graph: &mut DependencyGraph, line: &str) {
    let mut parts = line.split_whitespace();
    if let Some(path) = parts.next() {
        let version = parts.next();
        let id = ExternalId::name_version(Forge::GOLANG, path, version);
        graph.add_root(DependencyNode::new(id));
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}
