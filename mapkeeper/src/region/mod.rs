//! Region identifiers and the hierarchy they belong to.
//!
//! - [`RegionIndex`]: path of child ordinals from the root
//! - [`RegionHierarchy`]: read-only tree interface consumed by the layout
//! - [`RegionTree`]: JSON-loadable in-memory implementation

mod hierarchy;
mod index;
mod tree;

pub use hierarchy::RegionHierarchy;
pub use index::{ParseRegionIndexError, RegionIndex};
pub use tree::{RegionNode, RegionTree, RegionTreeError};
