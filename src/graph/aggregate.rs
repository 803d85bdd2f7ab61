//! Aggregate graph construction

use super::{DependencyGraph, DependencyNode, ExternalId};
use crate::bomtool::CodeLocation;
use std::path::Path;
use tracing::warn;

/// Merges the dependency graphs of all code locations into one project
/// graph.
///
/// Each code location becomes a synthetic wrapper node attached as a root
/// child, with that location's original graph grafted underneath. Wrapper
/// external ids are guaranteed unique: the location's relative path from
/// the source root and its tool type are appended to the original piece
/// sequence, so two locations that would otherwise share an id no longer
/// collide.
pub struct GraphAggregator {
    source_root: std::path::PathBuf,
}

impl GraphAggregator {
    pub fn new(source_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
        }
    }

    pub fn build_aggregate(&self, code_locations: &[CodeLocation]) -> DependencyGraph {
        let mut aggregate = DependencyGraph::new();
        for location in code_locations {
            let wrapper = self.wrapper_node(location);
            let root = aggregate.add_root(wrapper);
            aggregate.graft(root, &location.graph);
        }
        aggregate
    }

    fn wrapper_node(&self, location: &CodeLocation) -> DependencyNode {
        let original = &location.external_id;
        let name = original.name().map(str::to_string);
        let version = original.version().map(str::to_string);
        if name.is_none() {
            // never aborts aggregation; the wrapper just carries no name
            warn!(
                source_path = %location.source_path.display(),
                "Failed to get a name or version to use in the wrapper for a code location"
            );
        }

        let mut pieces: Vec<String> = original.pieces().to_vec();
        pieces.push(self.relative_source_path(location));
        pieces.push(location.tool_type.as_str().to_string());
        let wrapper_id = ExternalId::from_pieces(original.forge, pieces);

        DependencyNode::with_name_version(wrapper_id, name, version)
    }

    fn relative_source_path(&self, location: &CodeLocation) -> String {
        location
            .source_path
            .strip_prefix(&self.source_root)
            .unwrap_or(&location.source_path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
