//! Dependency graph model
//!
//! A [`DependencyGraph`] is a set of nodes keyed by [`ExternalId`] plus
//! parent→children edges rooted at zero or more root nodes. Graphs produced
//! by different code locations stay structurally independent until the
//! aggregation stage grafts them under per-location wrapper nodes.

mod aggregate;

pub use aggregate::GraphAggregator;

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The namespace/authority a component identifier is registered under.
///
/// Two forges are the same forge when their names match; the separator is
/// only used when rendering an id for humans.
#[derive(Debug, Clone, Copy)]
pub struct Forge {
    pub name: &'static str,
    pub separator: &'static str,
}

impl Forge {
    pub const NPMJS: Forge = Forge::new("npmjs", "/");
    pub const CRATES: Forge = Forge::new("crates", "/");
    pub const MAVEN: Forge = Forge::new("maven", ":");
    pub const GOLANG: Forge = Forge::new("golang", "/");
    pub const PYPI: Forge = Forge::new("pypi", "/");
    /// Forge for the synthetic project root of an aggregate document.
    pub const ROOT: Forge = Forge::new("/", "/");

    pub const fn new(name: &'static str, separator: &'static str) -> Self {
        Self { name, separator }
    }
}

impl PartialEq for Forge {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Forge {}

impl std::hash::Hash for Forge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Forge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// A structured, forge-scoped identifier for a component or code location.
///
/// Two ids are equal only when the forge and every piece match, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExternalId {
    pub forge: Forge,
    pieces: Vec<String>,
}

impl ExternalId {
    /// Id from a name and optional version, the common case for components.
    pub fn name_version(forge: Forge, name: &str, version: Option<&str>) -> Self {
        let mut pieces = vec![name.to_string()];
        if let Some(version) = version {
            pieces.push(version.to_string());
        }
        Self { forge, pieces }
    }

    /// Id from an arbitrary ordered piece sequence.
    pub fn from_pieces(forge: Forge, pieces: Vec<String>) -> Self {
        Self { forge, pieces }
    }

    pub fn name(&self) -> Option<&str> {
        self.pieces.first().map(String::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.pieces.get(1).map(String::as_str)
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.forge, self.pieces.join(self.forge.separator))
    }
}

/// Stable handle to a node within one graph.
pub type NodeIndex = usize;

#[derive(Debug, Clone, Serialize)]
pub struct DependencyNode {
    pub external_id: ExternalId,
    pub name: Option<String>,
    pub version: Option<String>,
    children: Vec<NodeIndex>,
}

impl DependencyNode {
    pub fn new(external_id: ExternalId) -> Self {
        let name = external_id.name().map(str::to_string);
        let version = external_id.version().map(str::to_string);
        Self {
            external_id,
            name,
            version,
            children: Vec::new(),
        }
    }

    pub fn with_name_version(
        external_id: ExternalId,
        name: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            external_id,
            name,
            version,
            children: Vec::new(),
        }
    }
}

/// Mutable dependency graph with insertion-order node storage.
///
/// Node identity is the node's [`ExternalId`]: adding a node with an id the
/// graph already contains returns the existing node, so merging is
/// deterministic and collision-free as long as ids are unique where they
/// must be (see [`GraphAggregator`] wrapper ids).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    roots: Vec<NodeIndex>,
    #[serde(skip)]
    index: HashMap<ExternalId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the index of the node already carrying the
    /// same external id. The first insertion wins for name/version.
    pub fn add_node(&mut self, node: DependencyNode) -> NodeIndex {
        if let Some(&existing) = self.index.get(&node.external_id) {
            return existing;
        }
        let idx = self.nodes.len();
        self.index.insert(node.external_id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    /// Adds a node and marks it as a root child of the graph.
    pub fn add_root(&mut self, node: DependencyNode) -> NodeIndex {
        let idx = self.add_node(node);
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
        idx
    }

    /// Records a parent→child edge. Duplicate edges collapse.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let children = &mut self.nodes[parent].children;
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Grafts `other` under `parent`: every node and edge of `other` is
    /// merged into this graph and `other`'s roots become children of
    /// `parent`.
    pub fn graft(&mut self, parent: NodeIndex, other: &DependencyGraph) {
        let mut mapping = Vec::with_capacity(other.nodes.len());
        for node in &other.nodes {
            let mut copy = node.clone();
            copy.children.clear();
            mapping.push(self.add_node(copy));
        }
        for (from, node) in other.nodes.iter().enumerate() {
            for &to in &node.children {
                self.add_child(mapping[from], mapping[to]);
            }
        }
        for &root in &other.roots {
            self.add_child(parent, mapping[root]);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &ExternalId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &ExternalId) -> Option<&DependencyNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn root_ids(&self) -> Vec<&ExternalId> {
        self.roots.iter().map(|&idx| &self.nodes[idx].external_id).collect()
    }

    pub fn children_of(&self, id: &ExternalId) -> Vec<&ExternalId> {
        match self.index.get(id) {
            Some(&idx) => self.nodes[idx]
                .children
                .iter()
                .map(|&c| &self.nodes[c].external_id)
                .collect(),
            None => Vec::new(),
        }
    }
}
