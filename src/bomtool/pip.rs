//! pip detector: requirements.txt files

use super::npm::directory_name;
use super::{CodeLocation, Detector, DetectorId, Extraction, ToolType};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use std::path::Path;

pub const PIP_REQUIREMENTS: DetectorId = DetectorId("pip-requirements");

const REQUIREMENTS: &str = "requirements.txt";

/// Detects pip projects by `requirements.txt` and extracts the pinned
/// requirement lines. Option lines (`-r`, `--index-url`, ...) are skipped.
pub struct PipRequirementsDetector;

impl Detector for PipRequirementsDetector {
    fn id(&self) -> DetectorId {
        PIP_REQUIREMENTS
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Pip
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(REQUIREMENTS).is_file()
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let requirements_path = directory.join(REQUIREMENTS);
        let content = match std::fs::read_to_string(&requirements_path)
            .with_context(|| format!("failed to read {}", requirements_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let mut graph = DependencyGraph::new();
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() || line.starts_with('-') {
                continue;
            }
            let (name, version) = match line.split_once("==") {
                Some((name, version)) => (name.trim(), Some(version.trim())),
                None => (trim_specifier(line), None),
            };
            let id = ExternalId::name_version(Forge::PYPI, name, version);
            graph.add_root(DependencyNode::new(id));
        }

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::Pip,
            external_id: ExternalId::name_version(Forge::PYPI, directory_name(directory), None),
            graph,
        }])
    }
}

/// Cuts a non-pinned requirement down to its package name, e.g.
/// `requests>=2.0,<3` → `requests`.
fn trim_specifier(line: &str) -> &str {
    line.split(|c| ['>', '<', '~', '!', '=', ';', ' '].contains(&c))
        .next()
        .unwrap_or(line)
        .trim()
}
