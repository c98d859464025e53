//! Deterministic in-memory storage engine.
//!
//! [`SimulatedStorage`] keeps a status record per region and emits the same
//! events a real engine would, but only moves a download forward when told
//! to ([`start`](SimulatedStorage::start),
//! [`complete`](SimulatedStorage::complete),
//! [`fail`](SimulatedStorage::fail)). That makes every intermediate state
//! reachable from tests and from scripted CLI runs.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use super::{Progress, StorageEngine, StorageEvent, StorageEventSender, SubscriptionId};
use crate::capability::{Capability, CapabilitySet};
use crate::region::RegionIndex;
use crate::status::Status;

/// A request received by [`SimulatedStorage`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRequest {
    /// [`StorageEngine::download`] was called.
    Download(RegionIndex, CapabilitySet),
    /// [`StorageEngine::cancel_download`] was called.
    CancelDownload(RegionIndex),
    /// [`StorageEngine::delete`] was called.
    Delete(RegionIndex, CapabilitySet),
}

#[derive(Debug, Clone)]
struct RegionRecord {
    status: Status,
    installed: CapabilitySet,
    /// `OnDisk` or `OnDiskOutOfDate` while content is installed.
    content: Option<Status>,
    /// Capabilities of the queued or running download.
    pending: Option<CapabilitySet>,
}

impl Default for RegionRecord {
    fn default() -> Self {
        Self {
            status: Status::NotDownloaded,
            installed: CapabilitySet::empty(),
            content: None,
            pending: None,
        }
    }
}

impl RegionRecord {
    fn revert(&mut self) {
        self.pending = None;
        self.status = self.content.unwrap_or(Status::NotDownloaded);
    }
}

#[derive(Default)]
struct Inner {
    regions: HashMap<RegionIndex, RegionRecord>,
    subscribers: Vec<(SubscriptionId, StorageEventSender)>,
    next_subscription: u64,
    requests: Vec<EngineRequest>,
}

impl Inner {
    fn emit(&mut self, event: StorageEvent) {
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }

    fn emit_status(&mut self, index: &RegionIndex) {
        self.emit(StorageEvent::StatusChanged(index.clone()));
    }
}

/// In-memory [`StorageEngine`] driven explicitly by its owner.
///
/// # Example
///
/// ```
/// use mapkeeper::{CapabilitySet, RegionIndex, SimulatedStorage, Status, StorageEngine};
///
/// let storage = SimulatedStorage::new();
/// let france = RegionIndex::from_path([0, 1]);
///
/// storage.download(&france, CapabilitySet::base_map());
/// assert_eq!(storage.query_status(&france).0, Status::InQueue);
///
/// storage.start(&france);
/// storage.complete(&france);
/// assert_eq!(
///     storage.query_status(&france),
///     (Status::OnDisk, CapabilitySet::base_map())
/// );
/// ```
#[derive(Default)]
pub struct SimulatedStorage {
    inner: Mutex<Inner>,
}

impl SimulatedStorage {
    /// Create an engine with nothing installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record installed content for a region without emitting an event.
    ///
    /// `status` must be [`Status::OnDisk`] or [`Status::OnDiskOutOfDate`].
    pub fn install(&self, index: &RegionIndex, status: Status, capabilities: CapabilitySet) {
        assert!(
            status.is_on_disk(),
            "installed regions must be on disk, got {}",
            status
        );
        let mut inner = self.inner.lock();
        inner.regions.insert(
            index.clone(),
            RegionRecord {
                status,
                installed: capabilities,
                content: Some(status),
                pending: None,
            },
        );
    }

    /// Builder form of [`install`](Self::install).
    pub fn with_installed(
        self,
        index: RegionIndex,
        status: Status,
        capabilities: CapabilitySet,
    ) -> Self {
        self.install(&index, status, capabilities);
        self
    }

    /// Force a region into an arbitrary state and notify subscribers.
    pub fn set_status(&self, index: &RegionIndex, status: Status, capabilities: CapabilitySet) {
        let mut inner = self.inner.lock();
        let record = inner.regions.entry(index.clone()).or_default();
        record.status = status;
        record.installed = capabilities;
        record.content = status.is_on_disk().then_some(status);
        if !status.is_active() {
            record.pending = None;
        }
        inner.emit_status(index);
    }

    /// Move a queued download to `Downloading`. Returns `false` if nothing
    /// is queued for the region.
    pub fn start(&self, index: &RegionIndex) -> bool {
        let mut inner = self.inner.lock();
        let Some(record) = inner.regions.get_mut(index) else {
            return false;
        };
        if record.pending.is_none() {
            return false;
        }
        record.status = Status::Downloading;
        debug!(region = %index, "Simulated download started");
        inner.emit_status(index);
        true
    }

    /// Finish the pending download: the requested capabilities become the
    /// installed ones and the region is current. Returns `false` if nothing
    /// is pending.
    pub fn complete(&self, index: &RegionIndex) -> bool {
        let mut inner = self.inner.lock();
        let Some(record) = inner.regions.get_mut(index) else {
            return false;
        };
        let Some(capabilities) = record.pending.take() else {
            return false;
        };
        record.installed = capabilities;
        record.status = Status::OnDisk;
        record.content = Some(Status::OnDisk);
        debug!(region = %index, capabilities = %capabilities, "Simulated download complete");
        inner.emit_status(index);
        true
    }

    /// Abort the pending download as if the transfer failed. The region
    /// returns to whatever is on disk. Returns `false` if nothing is pending.
    pub fn fail(&self, index: &RegionIndex) -> bool {
        let mut inner = self.inner.lock();
        let Some(record) = inner.regions.get_mut(index) else {
            return false;
        };
        if record.pending.is_none() {
            return false;
        }
        record.revert();
        debug!(region = %index, "Simulated download failed");
        inner.emit_status(index);
        true
    }

    /// Mark a current, idle region as out of date. Returns `false` if the
    /// region is not `OnDisk`.
    pub fn mark_out_of_date(&self, index: &RegionIndex) -> bool {
        let mut inner = self.inner.lock();
        let Some(record) = inner.regions.get_mut(index) else {
            return false;
        };
        if record.status != Status::OnDisk {
            return false;
        }
        record.status = Status::OnDiskOutOfDate;
        record.content = Some(Status::OnDiskOutOfDate);
        inner.emit_status(index);
        true
    }

    /// Emit a progress event for a region.
    pub fn report_progress(&self, index: &RegionIndex, progress: Progress) {
        self.inner
            .lock()
            .emit(StorageEvent::Progress(index.clone(), progress));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<EngineRequest> {
        self.inner.lock().requests.clone()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        self.inner.lock().requests.clear();
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl StorageEngine for SimulatedStorage {
    fn query_status(&self, index: &RegionIndex) -> (Status, CapabilitySet) {
        self.inner
            .lock()
            .regions
            .get(index)
            .map_or((Status::NotDownloaded, CapabilitySet::empty()), |record| {
                (record.status, record.installed)
            })
    }

    fn download(&self, index: &RegionIndex, capabilities: CapabilitySet) {
        let mut inner = self.inner.lock();
        inner
            .requests
            .push(EngineRequest::Download(index.clone(), capabilities));

        let record = inner.regions.entry(index.clone()).or_default();
        record.pending = Some(capabilities);
        if record.status != Status::Downloading {
            record.status = Status::InQueue;
        }
        inner.emit_status(index);
    }

    fn cancel_download(&self, index: &RegionIndex) {
        let mut inner = self.inner.lock();
        inner
            .requests
            .push(EngineRequest::CancelDownload(index.clone()));

        let Some(record) = inner.regions.get_mut(index) else {
            return;
        };
        if record.pending.is_none() {
            return;
        }
        record.revert();
        inner.emit_status(index);
    }

    fn delete(&self, index: &RegionIndex, capabilities: CapabilitySet) {
        let mut inner = self.inner.lock();
        inner
            .requests
            .push(EngineRequest::Delete(index.clone(), capabilities));

        let Some(record) = inner.regions.get_mut(index) else {
            return;
        };
        let Some(content) = record.content else {
            return;
        };

        let remaining = record.installed.difference(capabilities);
        if remaining.contains(Capability::BaseMap) {
            record.installed = remaining;
            record.status = content;
        } else {
            record.installed = CapabilitySet::empty();
            record.content = None;
            record.status = Status::NotDownloaded;
        }
        record.pending = None;
        inner.emit_status(index);
    }

    fn subscribe(&self, sender: StorageEventSender) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, sender));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .lock()
            .subscribers
            .retain(|(subscription, _)| *subscription != id);
    }
}
