//! Error types for the map layout.

use thiserror::Error;

use super::group::Group;
use crate::region::RegionIndex;
use crate::status::Status;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Caller contract errors surfaced by the public layout API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The region is not in the layout.
    #[error("region {0} is not tracked by the layout")]
    NotTracked(RegionIndex),

    /// A group-relative position past the end of the group.
    #[error("position {position} is out of range for group '{group}' ({count} items)")]
    OutOfRange {
        group: Group,
        position: usize,
        count: usize,
    },

    /// `retry` was called for a region whose request is already satisfied.
    #[error("region {0} has no pending request to retry")]
    NothingToRetry(RegionIndex),

    /// The index is not a downloadable leaf of the hierarchy.
    #[error("region {0} is not a downloadable region")]
    NotDownloadable(RegionIndex),
}

/// A broken structural invariant of the layout's collection.
///
/// These indicate a bug in the layout itself and are raised as panics when
/// invariant verification is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The split offsets are not ordered within the collection length.
    #[error("split offsets out of order: {split_a} <= {split_b} <= {len} does not hold")]
    SplitsOutOfOrder {
        split_a: usize,
        split_b: usize,
        len: usize,
    },

    /// Two neighbours in a group are not strictly ordered by name.
    #[error("group '{group}' is not sorted at position {position}")]
    Unsorted { group: Group, position: usize },

    /// A region appears more than once.
    #[error("region {0} appears more than once")]
    Duplicate(RegionIndex),

    /// An item's status does not belong in its group.
    #[error("status '{status}' is not allowed in group '{group}' (position {position})")]
    StatusNotAdmitted {
        group: Group,
        position: usize,
        status: Status,
    },
}
