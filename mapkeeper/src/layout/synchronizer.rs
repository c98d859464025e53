//! Applying storage engine events to the layout.
//!
//! | current group | new status      | effect                                         |
//! |---------------|-----------------|------------------------------------------------|
//! | not UpToDate  | OnDisk          | adopt capabilities, set status, move to UpToDate |
//! | UpToDate      | OnDisk          | adopt capabilities and status if they differ   |
//! | New           | NotDownloaded   | set status, keep the item                      |
//! | other         | NotDownloaded   | remove the item                                |
//! | any           | OnDiskOutOfDate | set status, drop pending request, move to OutOfDate |
//! | any           | transient       | set status                                     |

use tracing::{debug, trace};

use super::error::LayoutResult;
use super::group::Group;
use super::MapLayout;
use crate::region::RegionIndex;
use crate::status::Status;
use crate::storage::{Progress, StorageEvent};

impl MapLayout {
    /// Apply every engine event received since the last call.
    ///
    /// Returns how many events were handled. Events queued for a region the
    /// layout has since dropped are skipped.
    pub fn process_events(&mut self) -> LayoutResult<usize> {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            let index = match &event {
                StorageEvent::StatusChanged(index) | StorageEvent::Progress(index, _) => index,
            };
            if !self.partition.contains(index) {
                debug!(region = %index, "Skipping event for untracked region");
                continue;
            }
            match event {
                StorageEvent::StatusChanged(index) => self.on_status_changed(&index)?,
                StorageEvent::Progress(index, progress) => self.on_progress(&index, progress)?,
            }
            handled += 1;
        }
        Ok(handled)
    }

    /// React to a status change reported by the engine for `index`.
    ///
    /// The new status and capabilities are queried from the engine. The
    /// engine only reports regions the layout asked about, so an untracked
    /// index is a contract error.
    pub fn on_status_changed(&mut self, index: &RegionIndex) -> LayoutResult<()> {
        let (new_status, reported) = self.engine.query_status(index);
        let (group, position) = self.locate_tracked(index)?;
        debug!(
            region = %index,
            group = %group,
            position,
            status = %new_status,
            capabilities = %reported,
            "Region status changed"
        );

        match new_status {
            Status::OnDisk if group != Group::UpToDate => {
                let capabilities_changed = {
                    let item = self.item_mut(group, position)?;
                    let changed = item.installed != reported || group == Group::New;
                    if changed {
                        item.installed = reported;
                        item.requested = reported;
                    }
                    item.status = Status::OnDisk;
                    changed
                };
                if capabilities_changed {
                    self.notify_capabilities_changed(group, position);
                }
                self.notify_status_changed(group, position);

                let new_position =
                    self.partition
                        .move_to(group, position, Group::UpToDate, self.hierarchy.as_ref());
                self.notify_moved(group, position, Group::UpToDate, new_position);
            }
            Status::OnDisk => {
                let (status_changed, capabilities_changed) = {
                    let item = self.item_mut(group, position)?;
                    let status_changed = item.status != Status::OnDisk;
                    let capabilities_changed = item.installed != reported;
                    item.status = Status::OnDisk;
                    if capabilities_changed {
                        item.installed = reported;
                        item.requested = reported;
                    }
                    (status_changed, capabilities_changed)
                };
                if !status_changed && !capabilities_changed {
                    trace!(region = %index, "Ignoring repeated on-disk report");
                    return Ok(());
                }
                if capabilities_changed {
                    self.notify_capabilities_changed(group, position);
                }
                if status_changed {
                    self.notify_status_changed(group, position);
                }
            }
            Status::NotDownloaded if group == Group::New => {
                self.item_mut(group, position)?.status = Status::NotDownloaded;
                self.notify_status_changed(group, position);
            }
            Status::NotDownloaded => {
                self.partition.delete_at(group, position);
                debug!(region = %index, group = %group, "Region removed from disk");
                self.notify_deleted(group, position);
            }
            Status::OnDiskOutOfDate => {
                {
                    let item = self.item_mut(group, position)?;
                    item.status = Status::OnDiskOutOfDate;
                    item.installed = reported;
                    item.requested = reported;
                }
                self.notify_status_changed(group, position);

                if group != Group::OutOfDate {
                    let new_position = self.partition.move_to(
                        group,
                        position,
                        Group::OutOfDate,
                        self.hierarchy.as_ref(),
                    );
                    self.notify_moved(group, position, Group::OutOfDate, new_position);
                }
            }
            Status::InQueue | Status::Downloading | Status::Unknown => {
                self.item_mut(group, position)?.status = new_status;
                self.notify_status_changed(group, position);
            }
        }

        self.check_invariants();
        Ok(())
    }

    /// Forward download progress for `index` to the listener.
    pub fn on_progress(&self, index: &RegionIndex, progress: Progress) -> LayoutResult<()> {
        let (group, position) = self.locate_tracked(index)?;
        trace!(region = %index, progress = %progress, "Download progress");
        self.notify(|l| l.on_progress(group, position, progress));
        Ok(())
    }
}
