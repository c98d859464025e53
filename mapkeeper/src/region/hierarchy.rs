//! Read-only region hierarchy interface.

use super::index::RegionIndex;

/// A read-only tree of regions.
///
/// Leaves are the downloadable units. Inner nodes (continents, countries
/// split into states) only group them. The root is unnamed and is not a
/// region.
///
/// Implementations provide the two primitive queries; traversal helpers are
/// derived from them.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a hierarchy can be shared with
/// the storage engine behind an `Arc`.
pub trait RegionHierarchy: Send + Sync {
    /// Number of direct children of `parent`.
    ///
    /// Returns 0 for leaves and for indices outside the hierarchy.
    fn child_count(&self, parent: &RegionIndex) -> usize;

    /// Display name of `index`, used as the sort key inside each group.
    fn display_name(&self, index: &RegionIndex) -> &str;

    /// Indices of the direct children of `parent`.
    fn children(&self, parent: &RegionIndex) -> Vec<RegionIndex> {
        (0..self.child_count(parent))
            .map(|ordinal| parent.child(ordinal))
            .collect()
    }

    /// Returns `true` if `index` names a region in this hierarchy.
    fn contains(&self, index: &RegionIndex) -> bool {
        if index.is_root() {
            return false;
        }
        let mut node = RegionIndex::root();
        for &ordinal in index.path() {
            if ordinal >= self.child_count(&node) {
                return false;
            }
            node = node.child(ordinal);
        }
        true
    }

    /// Returns `true` if `index` is a downloadable region.
    fn is_leaf(&self, index: &RegionIndex) -> bool {
        self.contains(index) && self.child_count(index) == 0
    }

    /// All leaves, depth-first, in child order.
    fn leaves(&self) -> Vec<RegionIndex> {
        let mut leaves = Vec::new();
        let mut stack: Vec<RegionIndex> = self.children(&RegionIndex::root());
        stack.reverse();

        while let Some(node) = stack.pop() {
            let count = self.child_count(&node);
            if count == 0 {
                leaves.push(node);
            } else {
                stack.extend((0..count).rev().map(|ordinal| node.child(ordinal)));
            }
        }

        leaves
    }
}
