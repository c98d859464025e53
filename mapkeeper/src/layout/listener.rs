//! Change notifications for the UI.
//!
//! The layout holds at most one [`LayoutListener`]. Notifications are
//! delivered synchronously right after the mutation that caused them, with
//! group-relative positions that are valid at that moment.
//!
//! # Re-entrancy
//!
//! Handlers receive only groups and positions, never a handle to the
//! layout, so they cannot call back into it. Handlers that want to react
//! with further requests must queue them and issue them once the current
//! call returns. [`QueueingListener`] does
//! exactly that by turning every notification into a [`LayoutEvent`] on a
//! channel.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::group::Group;
use crate::storage::Progress;

/// Observer of layout changes.
///
/// Every method has an empty default so implementors only override what
/// they need.
pub trait LayoutListener: Send + Sync {
    /// An item entered, left, or moved between groups.
    ///
    /// - insertion: `old_position` is `None` and both groups are equal
    /// - deletion: `old_position == Some(new_position)` and both groups are
    ///   equal; the position is where the item used to be
    /// - move: the groups differ
    fn on_group_changed(
        &self,
        old_group: Group,
        old_position: Option<usize>,
        new_group: Group,
        new_position: usize,
    ) {
        let _ = (old_group, old_position, new_group, new_position);
    }

    /// The status of the item at `position` changed.
    fn on_status_changed(&self, group: Group, position: usize) {
        let _ = (group, position);
    }

    /// The installed capabilities of the item at `position` changed.
    fn on_capabilities_changed(&self, group: Group, position: usize) {
        let _ = (group, position);
    }

    /// Download progress for the item at `position`.
    fn on_progress(&self, group: Group, position: usize, progress: Progress) {
        let _ = (group, position, progress);
    }
}

/// A layout notification as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A new item appeared.
    Inserted { group: Group, position: usize },
    /// An item was removed from where it used to be.
    Deleted { group: Group, position: usize },
    /// An item moved to another group.
    Moved {
        from: (Group, usize),
        to: (Group, usize),
    },
    /// An item's status changed.
    StatusChanged { group: Group, position: usize },
    /// An item's installed capabilities changed.
    CapabilitiesChanged { group: Group, position: usize },
    /// Download progress for an item.
    Progress {
        group: Group,
        position: usize,
        progress: Progress,
    },
}

impl LayoutEvent {
    /// Classify a raw group change notification.
    pub fn from_group_change(
        old_group: Group,
        old_position: Option<usize>,
        new_group: Group,
        new_position: usize,
    ) -> Self {
        match old_position {
            None => Self::Inserted {
                group: new_group,
                position: new_position,
            },
            Some(position) if old_group == new_group => Self::Deleted {
                group: old_group,
                position,
            },
            Some(position) => Self::Moved {
                from: (old_group, position),
                to: (new_group, new_position),
            },
        }
    }
}

/// A [`LayoutListener`] that forwards every notification over a channel.
#[derive(Debug, Clone)]
pub struct QueueingListener {
    sender: UnboundedSender<LayoutEvent>,
}

impl QueueingListener {
    /// Wrap an existing sender.
    pub fn new(sender: UnboundedSender<LayoutEvent>) -> Self {
        Self { sender }
    }

    /// Create a listener together with the receiving end of its queue.
    pub fn channel() -> (Self, UnboundedReceiver<LayoutEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    fn push(&self, event: LayoutEvent) {
        // A closed queue just means nobody is listening any more.
        let _ = self.sender.send(event);
    }
}

impl LayoutListener for QueueingListener {
    fn on_group_changed(
        &self,
        old_group: Group,
        old_position: Option<usize>,
        new_group: Group,
        new_position: usize,
    ) {
        self.push(LayoutEvent::from_group_change(
            old_group,
            old_position,
            new_group,
            new_position,
        ));
    }

    fn on_status_changed(&self, group: Group, position: usize) {
        self.push(LayoutEvent::StatusChanged { group, position });
    }

    fn on_capabilities_changed(&self, group: Group, position: usize) {
        self.push(LayoutEvent::CapabilitiesChanged { group, position });
    }

    fn on_progress(&self, group: Group, position: usize, progress: Progress) {
        self.push(LayoutEvent::Progress {
            group,
            position,
            progress,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_change_classification() {
        assert_eq!(
            LayoutEvent::from_group_change(Group::New, None, Group::New, 2),
            LayoutEvent::Inserted {
                group: Group::New,
                position: 2
            }
        );
        assert_eq!(
            LayoutEvent::from_group_change(Group::UpToDate, Some(1), Group::UpToDate, 1),
            LayoutEvent::Deleted {
                group: Group::UpToDate,
                position: 1
            }
        );
        assert_eq!(
            LayoutEvent::from_group_change(Group::New, Some(0), Group::UpToDate, 3),
            LayoutEvent::Moved {
                from: (Group::New, 0),
                to: (Group::UpToDate, 3)
            }
        );
    }

    #[test]
    fn test_queueing_listener_forwards_events() {
        let (listener, mut events) = QueueingListener::channel();

        listener.on_status_changed(Group::OutOfDate, 0);
        listener.on_progress(Group::New, 1, Progress::new(1, 4));

        assert_eq!(
            events.try_recv().unwrap(),
            LayoutEvent::StatusChanged {
                group: Group::OutOfDate,
                position: 0
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            LayoutEvent::Progress {
                group: Group::New,
                position: 1,
                progress: Progress::new(1, 4)
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_closed_queue_is_ignored() {
        let (listener, events) = QueueingListener::channel();
        drop(events);
        listener.on_status_changed(Group::New, 0);
    }
}
