//! Storage status of a single region.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a region stands with respect to local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The engine has no information about the region.
    #[default]
    Unknown,
    /// Nothing is on disk and no download is pending.
    NotDownloaded,
    /// A download is queued but has not started.
    InQueue,
    /// A download is in progress.
    Downloading,
    /// The region is installed and current.
    OnDisk,
    /// The region is installed but a newer version exists.
    OnDiskOutOfDate,
}

impl Status {
    /// Returns `true` while a download is queued or running.
    pub fn is_active(self) -> bool {
        matches!(self, Self::InQueue | Self::Downloading)
    }

    /// Returns `true` if installed content exists for the region.
    pub fn is_on_disk(self) -> bool {
        matches!(self, Self::OnDisk | Self::OnDiskOutOfDate)
    }

    /// Returns `true` for statuses that only exist while a request is in flight.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::InQueue | Self::Downloading | Self::Unknown)
    }

    /// Sort rank used when seeding the catalog. Higher ranks come first.
    pub(crate) fn catalog_rank(self) -> u8 {
        match self {
            Self::OnDiskOutOfDate => 2,
            Self::OnDisk => 1,
            _ => 0,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NotDownloaded => "not downloaded",
            Self::InQueue => "in queue",
            Self::Downloading => "downloading",
            Self::OnDisk => "on disk",
            Self::OnDiskOutOfDate => "out of date",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
