//! Storage engine interface.
//!
//! The storage engine owns everything that touches the network or the file
//! system: fetching region packages, deleting them, and knowing what is on
//! disk. The layout only talks to it through [`StorageEngine`].
//!
//! Status and progress changes are reported asynchronously as
//! [`StorageEvent`] values sent to every subscriber's channel. Subscribers
//! drain their channel on their own thread, which keeps event handling
//! single-threaded without any locking on the subscriber side.
//!
//! [`SimulatedStorage`] is a deterministic in-memory engine for tests and
//! the command line.

mod simulated;

pub use simulated::{EngineRequest, SimulatedStorage};

use std::fmt;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::capability::CapabilitySet;
use crate::region::RegionIndex;
use crate::status::Status;

/// Sending half of a subscription channel.
pub type StorageEventSender = UnboundedSender<StorageEvent>;

/// Receiving half of a subscription channel.
pub type StorageEventReceiver = UnboundedReceiver<StorageEvent>;

/// Download progress for one region, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Bytes already stored locally.
    pub downloaded: u64,
    /// Total bytes expected from the server.
    pub total: u64,
}

impl Progress {
    /// Create a progress value.
    pub fn new(downloaded: u64, total: u64) -> Self {
        Self { downloaded, total }
    }

    /// Completed fraction in `0.0..=1.0`. Zero when the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.downloaded as f64 / self.total as f64).min(1.0)
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} bytes ({:.0}%)",
            self.downloaded,
            self.total,
            self.fraction() * 100.0
        )
    }
}

/// Asynchronous notification from the storage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEvent {
    /// The status of a region changed. Query the engine for the new value.
    StatusChanged(RegionIndex),
    /// More bytes of a region arrived.
    Progress(RegionIndex, Progress),
}

/// Handle returned by [`StorageEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Interface to the component that actually downloads and deletes regions.
///
/// Requests are fire-and-forget: their outcome arrives later as
/// [`StorageEvent::StatusChanged`] on every subscription.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Events may be produced on any
/// thread; subscribers decide where they are consumed.
pub trait StorageEngine: Send + Sync {
    /// Current status of a region and the capabilities it has installed.
    fn query_status(&self, index: &RegionIndex) -> (Status, CapabilitySet);

    /// Start (or queue) a download of `capabilities` for a region.
    fn download(&self, index: &RegionIndex, capabilities: CapabilitySet);

    /// Abort a queued or running download.
    fn cancel_download(&self, index: &RegionIndex);

    /// Remove `capabilities` of a region from disk.
    fn delete(&self, index: &RegionIndex, capabilities: CapabilitySet);

    /// Register a channel that receives every future event.
    fn subscribe(&self, sender: StorageEventSender) -> SubscriptionId;

    /// Stop sending events to a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        assert_eq!(Progress::new(50, 200).fraction(), 0.25);
        assert_eq!(Progress::new(10, 0).fraction(), 0.0);
        assert_eq!(Progress::new(300, 200).fraction(), 1.0);
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::new(1, 2).to_string(), "1/2 bytes (50%)");
    }
}
