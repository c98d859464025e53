//! In-memory region tree loaded from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hierarchy::RegionHierarchy;
use super::index::RegionIndex;

/// Errors that can occur while loading a region tree.
#[derive(Debug, Error)]
pub enum RegionTreeError {
    /// The file could not be read.
    #[error("failed to read region tree {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON was malformed.
    #[error("failed to parse region tree: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A node in a [`RegionTree`].
///
/// The JSON form nests nodes directly:
///
/// ```json
/// { "name": "World", "children": [
///     { "name": "Europe", "children": [ { "name": "France" } ] }
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionNode {
    /// Display name.
    pub name: String,

    /// Child nodes, empty for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RegionNode>,
}

impl RegionNode {
    /// A downloadable region with no children.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// An inner node grouping `children`.
    pub fn group(name: impl Into<String>, children: Vec<RegionNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// A [`RegionHierarchy`] held entirely in memory.
///
/// # Example
///
/// ```
/// use mapkeeper::region::{RegionNode, RegionTree};
/// use mapkeeper::RegionHierarchy;
///
/// let tree = RegionTree::new(vec![RegionNode::group(
///     "Europe",
///     vec![RegionNode::leaf("France"), RegionNode::leaf("Germany")],
/// )]);
///
/// let germany = tree.find("germany").unwrap();
/// assert_eq!(germany.to_string(), "0.1");
/// assert!(tree.is_leaf(&germany));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegionTree {
    root: RegionNode,
}

impl RegionTree {
    /// Create a tree whose top level is `children`.
    pub fn new(children: Vec<RegionNode>) -> Self {
        Self {
            root: RegionNode::group("", children),
        }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a tree from JSON. The top-level object is the unnamed root.
    pub fn from_json_str(json: &str) -> Result<Self, RegionTreeError> {
        let root: RegionNode = serde_json::from_str(json)?;
        Ok(Self { root })
    }

    /// Load a tree from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RegionTreeError> {
        let json = fs::read_to_string(path).map_err(|source| RegionTreeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Find a region by display name (case-insensitive), depth-first.
    pub fn find(&self, name: &str) -> Option<RegionIndex> {
        let mut stack = vec![(RegionIndex::root(), &self.root)];
        while let Some((index, node)) = stack.pop() {
            if !index.is_root() && node.name.eq_ignore_ascii_case(name) {
                return Some(index);
            }
            for (ordinal, child) in node.children.iter().enumerate().rev() {
                stack.push((index.child(ordinal), child));
            }
        }
        None
    }

    /// Resolve either a region name or a dot-separated index.
    pub fn resolve(&self, name_or_index: &str) -> Option<RegionIndex> {
        self.find(name_or_index).or_else(|| {
            name_or_index
                .parse::<RegionIndex>()
                .ok()
                .filter(|index| self.contains(index))
        })
    }

    fn node(&self, index: &RegionIndex) -> Option<&RegionNode> {
        index
            .path()
            .iter()
            .try_fold(&self.root, |node, &ordinal| node.children.get(ordinal))
    }
}

impl RegionHierarchy for RegionTree {
    fn child_count(&self, parent: &RegionIndex) -> usize {
        self.node(parent).map_or(0, |node| node.children.len())
    }

    fn display_name(&self, index: &RegionIndex) -> &str {
        self.node(index).map_or("", |node| node.name.as_str())
    }
}
