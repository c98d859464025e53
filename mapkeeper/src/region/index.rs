//! Hierarchical region identifier.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifies a node in a [`RegionHierarchy`](super::RegionHierarchy).
///
/// An index is the path of child ordinals leading from the (unnamed) root
/// to the node. World atlases typically use three levels
/// (group / country / region), but nothing here depends on the depth.
///
/// Indices display and parse as dot-separated ordinals:
///
/// ```
/// use mapkeeper::RegionIndex;
///
/// let index = RegionIndex::from_path([0, 2, 1]);
/// assert_eq!(index.to_string(), "0.2.1");
/// assert_eq!("0.2.1".parse::<RegionIndex>().unwrap(), index);
/// assert_eq!(index.parent(), Some(RegionIndex::from_path([0, 2])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RegionIndex {
    path: Vec<usize>,
}

impl RegionIndex {
    /// The root of the hierarchy. It is not itself a region.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build an index from a path of child ordinals.
    pub fn from_path(path: impl IntoIterator<Item = usize>) -> Self {
        Self {
            path: path.into_iter().collect(),
        }
    }

    /// The index of this node's `ordinal`-th child.
    pub fn child(&self, ordinal: usize) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(ordinal);
        Self { path }
    }

    /// The index of this node's parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.path.split_last()?;
        Some(Self::from_path(parent.iter().copied()))
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` for the root index.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// The child ordinals from the root down.
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return f.write_str("root");
        }
        for (i, ordinal) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", ordinal)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a valid region index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid region index '{input}': expected dot-separated ordinals like 0.2.1")]
pub struct ParseRegionIndexError {
    input: String,
}

impl FromStr for RegionIndex {
    type Err = ParseRegionIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "root" {
            return Ok(Self::root());
        }
        trimmed
            .split('.')
            .map(|part| part.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(|path| Self { path })
            .map_err(|_| ParseRegionIndexError {
                input: s.to_string(),
            })
    }
}
