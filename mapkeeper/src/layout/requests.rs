//! User requests: download, delete, retry and cancel.
//!
//! Requests are forwarded to the storage engine and return immediately.
//! Apart from tracking a newly requested region and remembering what the
//! user asked for, they do not change the layout; the resulting status
//! changes arrive later through [`MapLayout::process_events`].

use tracing::{debug, info, warn};

use super::error::{LayoutError, LayoutResult};
use super::group::Group;
use super::item::Item;
use super::MapLayout;
use crate::capability::CapabilitySet;
use crate::region::RegionIndex;
use crate::status::Status;

impl MapLayout {
    /// Ask the engine to download `capabilities` for a region.
    ///
    /// The base map is always added. A region that is not tracked yet is
    /// inserted into the New group and announced to the listener.
    pub fn request_download(
        &mut self,
        index: &RegionIndex,
        capabilities: CapabilitySet,
    ) -> LayoutResult<()> {
        if !self.hierarchy.is_leaf(index) {
            warn!(region = %index, "Download requested for a region that is not downloadable");
            return Err(LayoutError::NotDownloadable(index.clone()));
        }

        let normalized = capabilities.for_download();
        match self.partition.locate(index) {
            Some((group, position)) => {
                self.item_mut(group, position)?.requested = normalized;
            }
            None => {
                let item = Item::new(index.clone(), Status::NotDownloaded, normalized);
                let position = self
                    .partition
                    .insert(Group::New, item, self.hierarchy.as_ref());
                self.notify_inserted(Group::New, position);
                self.check_invariants();
            }
        }

        info!(region = %index, capabilities = %normalized, "Download requested");
        self.engine.download(index, normalized);
        Ok(())
    }

    /// Ask the engine to download `capabilities` for the item at a
    /// group-relative position.
    pub fn request_download_at(
        &mut self,
        group: Group,
        position: usize,
        capabilities: CapabilitySet,
    ) -> LayoutResult<()> {
        let normalized = capabilities.for_download();
        let item = self.item_mut(group, position)?;
        item.requested = normalized;
        let index = item.index.clone();

        info!(region = %index, capabilities = %normalized, "Download requested");
        self.engine.download(&index, normalized);
        Ok(())
    }

    /// Ask the engine to delete `capabilities` of a tracked region.
    ///
    /// Deleting the base map also deletes routing data. The layout changes
    /// once the engine reports the new status.
    pub fn request_delete(
        &mut self,
        index: &RegionIndex,
        capabilities: CapabilitySet,
    ) -> LayoutResult<()> {
        let (group, position) = self.locate_tracked(index)?;
        self.request_delete_at(group, position, capabilities)
    }

    /// Ask the engine to delete `capabilities` of the item at a
    /// group-relative position.
    pub fn request_delete_at(
        &mut self,
        group: Group,
        position: usize,
        capabilities: CapabilitySet,
    ) -> LayoutResult<()> {
        let index = self.item(group, position)?.index.clone();
        let normalized = capabilities.for_delete();

        info!(region = %index, capabilities = %normalized, "Delete requested");
        self.engine.delete(&index, normalized);
        Ok(())
    }

    /// Re-issue the last download request for an item whose requested
    /// capabilities are not installed.
    pub fn retry(&mut self, group: Group, position: usize) -> LayoutResult<()> {
        let item = self.item(group, position)?;
        if !item.has_pending_request() {
            return Err(LayoutError::NothingToRetry(item.index.clone()));
        }
        let index = item.index.clone();
        let requested = item.requested;

        info!(region = %index, capabilities = %requested, "Retrying download");
        self.engine.download(&index, requested);
        Ok(())
    }

    /// Abort the download of an item and forget what was requested.
    pub fn cancel(&mut self, group: Group, position: usize) -> LayoutResult<()> {
        let item = self.item_mut(group, position)?;
        item.requested = item.installed;
        let index = item.index.clone();

        info!(region = %index, "Download cancelled");
        self.engine.cancel_download(&index);
        Ok(())
    }

    /// Returns `true` if any tracked region is queued or downloading.
    pub fn is_any_download_active(&self) -> bool {
        self.partition.iter().any(|item| item.status.is_active())
    }

    /// Download the current capabilities of every out-of-date region that
    /// is not already queued or downloading.
    ///
    /// Returns the number of downloads requested.
    pub fn update_all(&mut self) -> LayoutResult<usize> {
        let stale: Vec<(RegionIndex, CapabilitySet)> = self
            .group_items(Group::OutOfDate)
            .iter()
            .filter(|item| !item.status.is_active())
            .map(|item| (item.index.clone(), item.installed))
            .collect();

        for (index, capabilities) in &stale {
            self.request_download(index, *capabilities)?;
        }

        debug!(count = stale.len(), "Requested update of out-of-date regions");
        Ok(stale.len())
    }

    /// Cancel every queued or running download.
    ///
    /// Unlike [`cancel`](Self::cancel), requested capabilities are kept, so
    /// each region can be retried later. Returns the number of downloads
    /// cancelled.
    pub fn cancel_all(&mut self) -> LayoutResult<usize> {
        let active: Vec<RegionIndex> = self
            .partition
            .iter()
            .filter(|item| item.status.is_active())
            .map(|item| item.index.clone())
            .collect();

        for index in &active {
            self.engine.cancel_download(index);
        }

        info!(count = active.len(), "Cancelled active downloads");
        Ok(active.len())
    }
}
