//! The three groups a tracked region can belong to.

use std::fmt;

use crate::status::Status;

/// A contiguous zone of the layout.
///
/// Groups are stored in this order: new regions first, then out-of-date
/// ones, then current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    /// Requested regions with no installed content yet.
    New,
    /// Installed regions with a newer version available.
    OutOfDate,
    /// Installed, current regions.
    UpToDate,
}

impl Group {
    /// All groups in storage order.
    pub const ALL: [Group; 3] = [Group::New, Group::OutOfDate, Group::UpToDate];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::OutOfDate => "out of date",
            Self::UpToDate => "up to date",
        }
    }

    /// Returns `true` if an item with `status` may live in this group.
    ///
    /// Transient statuses are admitted everywhere an item can be while a
    /// request for it is in flight.
    pub fn admits(self, status: Status) -> bool {
        match self {
            Self::New => !status.is_on_disk(),
            Self::OutOfDate => status == Status::OnDiskOutOfDate || status.is_transient(),
            Self::UpToDate => status == Status::OnDisk || status.is_transient(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
