//! A single tracked region.

use crate::capability::CapabilitySet;
use crate::region::RegionIndex;
use crate::status::Status;

/// A region tracked by the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Which region this is.
    pub index: RegionIndex,

    /// Last status reported by the storage engine.
    pub status: Status,

    /// Capabilities currently installed.
    ///
    /// For new regions nothing is installed yet; by convention this mirrors
    /// `requested` until the first download completes.
    pub installed: CapabilitySet,

    /// Capabilities most recently asked for by the user.
    pub requested: CapabilitySet,
}

impl Item {
    /// Create an item whose installed and requested capabilities agree.
    pub fn new(index: RegionIndex, status: Status, capabilities: CapabilitySet) -> Self {
        Self {
            index,
            status,
            installed: capabilities,
            requested: capabilities,
        }
    }

    /// Returns `true` if the user asked for something not yet installed.
    pub fn has_pending_request(&self) -> bool {
        self.installed != self.requested
    }
}
