//! yarn detector: yarn.lock lockfiles
//!
//! A lockfile alone is not a project marker, so this detector demands that
//! the npm detector has applied in the same directory before it extracts.

use super::npm::{directory_name, NPM_PACKAGE_JSON};
use super::{CodeLocation, Detector, DetectorId, Extraction, ToolType};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use std::path::Path;

pub const YARN_LOCK: DetectorId = DetectorId("yarn-lock");

const YARN_LOCK_FILENAME: &str = "yarn.lock";

/// Extracts resolved dependency versions from a v1 `yarn.lock`.
pub struct YarnLockDetector;

impl Detector for YarnLockDetector {
    fn id(&self) -> DetectorId {
        YARN_LOCK
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Yarn
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(YARN_LOCK_FILENAME).is_file()
    }

    fn demands(&self) -> Vec<DetectorId> {
        vec![NPM_PACKAGE_JSON]
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let lock_path = directory.join(YARN_LOCK_FILENAME);
        let content = match std::fs::read_to_string(&lock_path)
            .with_context(|| format!("failed to read {}", lock_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let mut graph = DependencyGraph::new();
        let mut current: Option<String> = None;
        for line in content.lines() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !trimmed.starts_with(' ') && trimmed.ends_with(':') {
                current = entry_package_name(trimmed);
            } else if let Some(name) = &current {
                if let Some(version) = trimmed.trim_start().strip_prefix("version ") {
                    let version = version.trim_matches('"');
                    let id = ExternalId::name_version(Forge::NPMJS, name, Some(version));
                    graph.add_root(DependencyNode::new(id));
                    current = None;
                }
            }
        }

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::Yarn,
            external_id: ExternalId::name_version(
                Forge::NPMJS,
                directory_name(directory),
                None,
            ),
            graph,
        }])
    }
}

/// Pulls the bare package name out of a lock entry header such as
/// `"@scope/pkg@^1.0.0", "@scope/pkg@^1.2.0":`.
fn entry_package_name(header: &str) -> Option<String> {
    let first = header.trim_end_matches(':').split(',').next()?.trim();
    let first = first.trim_matches('"');
    let at = if let Some(rest) = first.strip_prefix('@') {
        // scoped package: the version separator is the second '@'
        rest.find('@').map(|i| i + 1)?
    } else {
        first.find('@')?
    };
    Some(first[..at].to_string())
}
