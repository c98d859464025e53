//! The ordered, grouped collection behind the layout.
//!
//! All tracked items live in one vector split by two offsets:
//!
//! ```text
//!  0          split_a          split_b             len
//!  ├── New ──────┼── OutOfDate ───┼── UpToDate ──────┤
//! ```
//!
//! Each group is kept sorted by region display name. Positions handed out
//! by this module are group-relative and become stale after any insert,
//! delete or move that touches the group; re-resolve them with
//! [`Partition::locate`].

use std::cmp::Ordering;
use std::collections::HashSet;

use super::error::InvariantViolation;
use super::group::Group;
use super::item::Item;
use crate::region::{RegionHierarchy, RegionIndex};

/// Order two items by display name, then by index so the order is strict.
pub(crate) fn by_name(hierarchy: &dyn RegionHierarchy, lhs: &Item, rhs: &Item) -> Ordering {
    hierarchy
        .display_name(&lhs.index)
        .cmp(hierarchy.display_name(&rhs.index))
        .then_with(|| lhs.index.cmp(&rhs.index))
}

/// Items partitioned into [`Group`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    items: Vec<Item>,
    split_a: usize,
    split_b: usize,
}

impl Partition {
    /// Create an empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a partition from items already in storage order.
    pub(crate) fn from_parts(items: Vec<Item>, split_a: usize, split_b: usize) -> Self {
        assert!(
            split_a <= split_b && split_b <= items.len(),
            "invalid split offsets {}..{} for {} items",
            split_a,
            split_b,
            items.len()
        );
        Self {
            items,
            split_a,
            split_b,
        }
    }

    /// Total number of tracked items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The two split offsets.
    pub fn splits(&self) -> (usize, usize) {
        (self.split_a, self.split_b)
    }

    /// Absolute offset of the first item of `group`.
    pub fn start_offset(&self, group: Group) -> usize {
        match group {
            Group::New => 0,
            Group::OutOfDate => self.split_a,
            Group::UpToDate => self.split_b,
        }
    }

    fn end_offset(&self, group: Group) -> usize {
        match group {
            Group::New => self.split_a,
            Group::OutOfDate => self.split_b,
            Group::UpToDate => self.items.len(),
        }
    }

    /// Number of items in `group`.
    pub fn count(&self, group: Group) -> usize {
        self.end_offset(group) - self.start_offset(group)
    }

    /// The items of `group`, in order.
    pub fn group_items(&self, group: Group) -> &[Item] {
        &self.items[self.start_offset(group)..self.end_offset(group)]
    }

    /// All items in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    fn absolute(&self, group: Group, position: usize) -> Option<usize> {
        (position < self.count(group)).then(|| self.start_offset(group) + position)
    }

    /// The item at a group-relative position.
    pub fn item_at(&self, group: Group, position: usize) -> Option<&Item> {
        self.absolute(group, position).map(|offset| &self.items[offset])
    }

    /// Mutable access to the item at a group-relative position.
    ///
    /// Callers may change status and capabilities but must not change the
    /// index, which would break the ordering.
    pub(crate) fn item_at_mut(&mut self, group: Group, position: usize) -> Option<&mut Item> {
        let offset = self.absolute(group, position)?;
        Some(&mut self.items[offset])
    }

    /// Find the group and position of a region.
    pub fn locate(&self, index: &RegionIndex) -> Option<(Group, usize)> {
        let offset = self.items.iter().position(|item| &item.index == index)?;
        let located = if offset >= self.split_b {
            (Group::UpToDate, offset - self.split_b)
        } else if offset >= self.split_a {
            (Group::OutOfDate, offset - self.split_a)
        } else {
            (Group::New, offset)
        };
        Some(located)
    }

    /// Returns `true` if the region is tracked.
    pub fn contains(&self, index: &RegionIndex) -> bool {
        self.items.iter().any(|item| &item.index == index)
    }

    /// Insert `item` into `group`, keeping the group sorted.
    ///
    /// Returns the item's position within the group.
    ///
    /// # Panics
    ///
    /// Panics if the group does not admit the item's status.
    pub(crate) fn insert(
        &mut self,
        group: Group,
        item: Item,
        hierarchy: &dyn RegionHierarchy,
    ) -> usize {
        assert!(
            group.admits(item.status),
            "cannot insert {} with status '{}' into group '{}'",
            item.index,
            item.status,
            group
        );
        debug_assert!(
            !self.contains(&item.index),
            "region {} is already tracked",
            item.index
        );

        let start = self.start_offset(group);
        let end = self.end_offset(group);
        let position = self.items[start..end]
            .partition_point(|existing| by_name(hierarchy, existing, &item) == Ordering::Less);

        self.items.insert(start + position, item);
        match group {
            Group::New => {
                self.split_a += 1;
                self.split_b += 1;
            }
            Group::OutOfDate => self.split_b += 1,
            Group::UpToDate => {}
        }

        position
    }

    /// Remove and return the item at a group-relative position.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range.
    pub(crate) fn delete_at(&mut self, group: Group, position: usize) -> Item {
        let Some(offset) = self.absolute(group, position) else {
            panic!(
                "delete at position {} of group '{}' with {} items",
                position,
                group,
                self.count(group)
            );
        };

        match group {
            Group::New => {
                self.split_a -= 1;
                self.split_b -= 1;
            }
            Group::OutOfDate => self.split_b -= 1,
            Group::UpToDate => {}
        }

        self.items.remove(offset)
    }

    /// Move an item to another group. Returns its position in `new_group`.
    pub(crate) fn move_to(
        &mut self,
        group: Group,
        position: usize,
        new_group: Group,
        hierarchy: &dyn RegionHierarchy,
    ) -> usize {
        let item = self.delete_at(group, position);
        self.insert(new_group, item, hierarchy)
    }

    /// Check every structural invariant and report the first violation.
    pub fn verify(&self, hierarchy: &dyn RegionHierarchy) -> Result<(), InvariantViolation> {
        if self.split_a > self.split_b || self.split_b > self.items.len() {
            return Err(InvariantViolation::SplitsOutOfOrder {
                split_a: self.split_a,
                split_b: self.split_b,
                len: self.items.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(&item.index) {
                return Err(InvariantViolation::Duplicate(item.index.clone()));
            }
        }

        for group in Group::ALL {
            let items = self.group_items(group);
            for (position, item) in items.iter().enumerate() {
                if !group.admits(item.status) {
                    return Err(InvariantViolation::StatusNotAdmitted {
                        group,
                        position,
                        status: item.status,
                    });
                }
            }
            for (position, pair) in items.windows(2).enumerate() {
                if by_name(hierarchy, &pair[0], &pair[1]) != Ordering::Less {
                    return Err(InvariantViolation::Unsorted {
                        group,
                        position: position + 1,
                    });
                }
            }
        }

        Ok(())
    }
}
