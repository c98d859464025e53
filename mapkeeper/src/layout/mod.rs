//! The map layout: tracked regions grouped for display.
//!
//! [`MapLayout`] keeps every region the user has installed or asked for in
//! one of three [`Group`]s and keeps each group sorted by name. It is the
//! only owner of that collection and the only component that mutates it.
//!
//! # Data Flow
//!
//! ```text
//!  initialize() ──► catalog (installed regions)
//!                        │
//!  request_*() ─────────►│◄──────── process_events() ◄── StorageEngine
//!        │               ▼
//!        │          Partition (insert / delete_at / move_to)
//!        │               │
//!        ▼               ▼
//!  StorageEngine    LayoutListener
//! ```
//!
//! # Threading
//!
//! The layout is single-threaded. Engine events queue up on a channel and
//! are applied when the owner calls [`MapLayout::process_events`] on its
//! own thread.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mapkeeper::region::{RegionNode, RegionTree};
//! use mapkeeper::{CapabilitySet, Group, LayoutConfig, MapLayout, SimulatedStorage};
//!
//! let tree = Arc::new(RegionTree::new(vec![RegionNode::leaf("Iceland")]));
//! let storage = Arc::new(SimulatedStorage::new());
//! let mut layout = MapLayout::new(tree.clone(), storage.clone(), LayoutConfig::default());
//! layout.initialize();
//!
//! let iceland = tree.find("Iceland").unwrap();
//! layout.request_download(&iceland, CapabilitySet::base_map()).unwrap();
//! assert_eq!(layout.count_in_group(Group::New), 1);
//!
//! storage.start(&iceland);
//! storage.complete(&iceland);
//! layout.process_events().unwrap();
//! assert_eq!(layout.count_in_group(Group::UpToDate), 1);
//! ```

mod catalog;
mod config;
mod error;
mod group;
mod item;
mod listener;
mod partition;
mod requests;
mod synchronizer;

pub use config::LayoutConfig;
pub use error::{InvariantViolation, LayoutError, LayoutResult};
pub use group::Group;
pub use item::Item;
pub use listener::{LayoutEvent, LayoutListener, QueueingListener};
pub use partition::Partition;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::capability::CapabilitySet;
use crate::region::{RegionHierarchy, RegionIndex};
use crate::status::Status;
use crate::storage::{StorageEngine, StorageEventReceiver, SubscriptionId};

/// Regions grouped into new, out-of-date and up-to-date, kept in sync with
/// a [`StorageEngine`].
pub struct MapLayout {
    hierarchy: Arc<dyn RegionHierarchy>,
    engine: Arc<dyn StorageEngine>,
    config: LayoutConfig,
    partition: Partition,
    listener: Option<Arc<dyn LayoutListener>>,
    subscription: SubscriptionId,
    events: StorageEventReceiver,
    initialized: bool,
}

impl MapLayout {
    /// Create an empty layout and subscribe to `engine`.
    ///
    /// Call [`initialize`](Self::initialize) to seed it with the regions
    /// already on disk.
    pub fn new(
        hierarchy: Arc<dyn RegionHierarchy>,
        engine: Arc<dyn StorageEngine>,
        config: LayoutConfig,
    ) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        let subscription = engine.subscribe(sender);
        debug!(subscription = subscription.0, "Map layout subscribed to storage");

        Self {
            hierarchy,
            engine,
            config,
            partition: Partition::new(),
            listener: None,
            subscription,
            events,
            initialized: false,
        }
    }

    /// Seed the layout with every installed region.
    ///
    /// Returns `false` without doing anything if the layout was already
    /// initialized. Regions requested before initialization stay in the New
    /// group; installed regions that are already tracked are not added again.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;

        if self.partition.is_empty() {
            self.partition = catalog::build(self.hierarchy.as_ref(), self.engine.as_ref());
        } else {
            let (items, _) =
                catalog::installed_items(self.hierarchy.as_ref(), self.engine.as_ref());
            for item in items {
                if self.partition.contains(&item.index) {
                    continue;
                }
                let group = match item.status {
                    Status::OnDiskOutOfDate => Group::OutOfDate,
                    _ => Group::UpToDate,
                };
                self.partition.insert(group, item, self.hierarchy.as_ref());
            }
        }
        self.check_invariants();

        info!(
            new = self.count_in_group(Group::New),
            out_of_date = self.count_in_group(Group::OutOfDate),
            up_to_date = self.count_in_group(Group::UpToDate),
            "Map layout initialized"
        );
        true
    }

    /// Returns `true` once [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The layout's configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The region hierarchy the layout was built from.
    pub fn hierarchy(&self) -> &dyn RegionHierarchy {
        self.hierarchy.as_ref()
    }

    /// Install the listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: Arc<dyn LayoutListener>) {
        self.listener = Some(listener);
    }

    /// Remove the listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// The underlying grouped collection.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Number of items in `group`.
    pub fn count_in_group(&self, group: Group) -> usize {
        self.partition.count(group)
    }

    /// The items of `group`, in display order.
    pub fn group_items(&self, group: Group) -> &[Item] {
        self.partition.group_items(group)
    }

    /// Find the group and position of a region, if tracked.
    pub fn locate(&self, index: &RegionIndex) -> Option<(Group, usize)> {
        self.partition.locate(index)
    }

    /// The item at a group-relative position.
    pub fn item(&self, group: Group, position: usize) -> LayoutResult<&Item> {
        self.partition
            .item_at(group, position)
            .ok_or_else(|| self.out_of_range(group, position))
    }

    /// Display name of the item at a group-relative position.
    pub fn name(&self, group: Group, position: usize) -> LayoutResult<&str> {
        let item = self.item(group, position)?;
        Ok(self.hierarchy.display_name(&item.index))
    }

    /// Status of the item at a group-relative position.
    pub fn status(&self, group: Group, position: usize) -> LayoutResult<Status> {
        Ok(self.item(group, position)?.status)
    }

    /// Installed capabilities of the item at a group-relative position.
    pub fn capabilities(&self, group: Group, position: usize) -> LayoutResult<CapabilitySet> {
        Ok(self.item(group, position)?.installed)
    }

    /// Requested capabilities of the item at a group-relative position.
    pub fn requested_capabilities(
        &self,
        group: Group,
        position: usize,
    ) -> LayoutResult<CapabilitySet> {
        Ok(self.item(group, position)?.requested)
    }

    fn item_mut(&mut self, group: Group, position: usize) -> LayoutResult<&mut Item> {
        let count = self.partition.count(group);
        self.partition
            .item_at_mut(group, position)
            .ok_or(LayoutError::OutOfRange {
                group,
                position,
                count,
            })
    }

    fn out_of_range(&self, group: Group, position: usize) -> LayoutError {
        LayoutError::OutOfRange {
            group,
            position,
            count: self.partition.count(group),
        }
    }

    /// Locate a region the caller expects to be tracked.
    fn locate_tracked(&self, index: &RegionIndex) -> LayoutResult<(Group, usize)> {
        self.partition.locate(index).ok_or_else(|| {
            error!(region = %index, "Region is not tracked by the map layout");
            LayoutError::NotTracked(index.clone())
        })
    }

    fn check_invariants(&self) {
        if !self.config.verify_invariants {
            return;
        }
        if let Err(violation) = self.partition.verify(self.hierarchy.as_ref()) {
            panic!("map layout invariant violated: {}", violation);
        }
    }

    fn notify(&self, f: impl FnOnce(&dyn LayoutListener)) {
        if let Some(listener) = &self.listener {
            f(listener.as_ref());
        }
    }

    fn notify_inserted(&self, group: Group, position: usize) {
        self.notify(|l| l.on_group_changed(group, None, group, position));
    }

    fn notify_deleted(&self, group: Group, position: usize) {
        self.notify(|l| l.on_group_changed(group, Some(position), group, position));
    }

    fn notify_moved(
        &self,
        old_group: Group,
        old_position: usize,
        new_group: Group,
        new_position: usize,
    ) {
        self.notify(|l| {
            l.on_group_changed(old_group, Some(old_position), new_group, new_position)
        });
    }

    fn notify_status_changed(&self, group: Group, position: usize) {
        self.notify(|l| l.on_status_changed(group, position));
    }

    fn notify_capabilities_changed(&self, group: Group, position: usize) {
        self.notify(|l| l.on_capabilities_changed(group, position));
    }
}

impl Drop for MapLayout {
    fn drop(&mut self) {
        self.engine.unsubscribe(self.subscription);
        debug!(subscription = self.subscription.0, "Map layout unsubscribed from storage");
    }
}

impl std::fmt::Debug for MapLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapLayout")
            .field("config", &self.config)
            .field("partition", &self.partition)
            .field("has_listener", &self.listener.is_some())
            .field("subscription", &self.subscription)
            .field("initialized", &self.initialized)
            .finish()
    }
}
