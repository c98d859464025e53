//! Seeding the layout from regions already on disk.

use std::cmp::Ordering;

use tracing::trace;

use super::item::Item;
use super::partition::{by_name, Partition};
use crate::region::RegionHierarchy;
use crate::status::Status;
use crate::storage::StorageEngine;

/// Installed leaves of `hierarchy` in storage order, and the offset where
/// the up-to-date ones begin.
///
/// Walks every leaf depth-first and keeps only those the engine reports as
/// `OnDisk` or `OnDiskOutOfDate`. Out-of-date regions sort first, then
/// current ones; each run is ordered by display name.
pub(crate) fn installed_items(
    hierarchy: &dyn RegionHierarchy,
    engine: &dyn StorageEngine,
) -> (Vec<Item>, usize) {
    let mut items: Vec<Item> = hierarchy
        .leaves()
        .into_iter()
        .filter_map(|index| {
            let (status, capabilities) = engine.query_status(&index);
            if status.is_on_disk() {
                Some(Item::new(index, status, capabilities))
            } else {
                trace!(region = %index, status = %status, "Skipping region not on disk");
                None
            }
        })
        .collect();

    items.sort_by(|lhs, rhs| {
        match rhs.status.catalog_rank().cmp(&lhs.status.catalog_rank()) {
            Ordering::Equal => by_name(hierarchy, lhs, rhs),
            rank => rank,
        }
    });

    let boundary = items.partition_point(|item| item.status == Status::OnDiskOutOfDate);
    (items, boundary)
}

/// Build a fresh partition with an empty New group.
pub(crate) fn build(hierarchy: &dyn RegionHierarchy, engine: &dyn StorageEngine) -> Partition {
    let (items, boundary) = installed_items(hierarchy, engine);
    Partition::from_parts(items, 0, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySet;
    use crate::layout::Group;
    use crate::region::{RegionIndex, RegionNode, RegionTree};
    use crate::storage::SimulatedStorage;

    fn europe() -> RegionTree {
        RegionTree::new(vec![RegionNode::group(
            "Europe",
            vec![
                RegionNode::leaf("Spain"),
                RegionNode::leaf("Germany"),
                RegionNode::leaf("France"),
                RegionNode::leaf("Italy"),
            ],
        )])
    }

    fn region(ordinal: usize) -> RegionIndex {
        RegionIndex::from_path([0, ordinal])
    }

    #[test]
    fn test_only_installed_regions_are_seeded() {
        let storage = SimulatedStorage::new()
            .with_installed(region(0), Status::OnDisk, CapabilitySet::base_map())
            .with_installed(region(2), Status::OnDisk, CapabilitySet::all());

        let partition = build(&europe(), &storage);

        assert_eq!(partition.len(), 2);
        assert!(partition.locate(&region(1)).is_none());
        assert!(partition.locate(&region(3)).is_none());
    }

    #[test]
    fn test_out_of_date_sorted_before_up_to_date() {
        let tree = europe();
        let storage = SimulatedStorage::new()
            .with_installed(region(0), Status::OnDisk, CapabilitySet::base_map())
            .with_installed(region(1), Status::OnDiskOutOfDate, CapabilitySet::all())
            .with_installed(region(2), Status::OnDisk, CapabilitySet::base_map())
            .with_installed(region(3), Status::OnDiskOutOfDate, CapabilitySet::base_map());

        let partition = build(&tree, &storage);

        assert_eq!(partition.splits(), (0, 2));
        let names = |group| {
            partition
                .group_items(group)
                .iter()
                .map(|item| tree.display_name(&item.index).to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(Group::OutOfDate), vec!["Germany", "Italy"]);
        assert_eq!(names(Group::UpToDate), vec!["France", "Spain"]);
        assert_eq!(partition.verify(&tree), Ok(()));
    }

    #[test]
    fn test_seeded_items_have_matching_requests() {
        let storage =
            SimulatedStorage::new().with_installed(region(1), Status::OnDisk, CapabilitySet::all());

        let partition = build(&europe(), &storage);
        let item = partition.item_at(Group::UpToDate, 0).unwrap();

        assert_eq!(item.installed, CapabilitySet::all());
        assert!(!item.has_pending_request());
    }
}
