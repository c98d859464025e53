//! Mapkeeper - offline region package tracking for navigation apps
//!
//! This library keeps track of which offline map regions are installed,
//! out of date, or newly requested, and presents them to a UI as three
//! ordered groups. It reacts to status and progress events from an external
//! storage engine and forwards user requests (download, delete, retry,
//! cancel) to it.
//!
//! # Architecture
//!
//! ```text
//! RegionHierarchy ──┐
//!                   ├──► MapLayout ──► LayoutListener (UI)
//! StorageEngine ────┘      │  ▲
//!      ▲                   │  │ StorageEvent (mpsc)
//!      └── requests ───────┘  │
//!      └──────────────────────┘
//! ```
//!
//! - [`region`]: region identifiers and the hierarchy they live in
//! - [`capability`]: content flags (base map, routing) and their dependencies
//! - [`status`]: per-region storage status
//! - [`storage`]: the storage engine interface plus an in-memory simulator
//! - [`layout`]: the grouped, ordered collection and its state machine
//! - [`config`] / [`logging`]: ambient configuration and tracing setup

pub mod capability;
pub mod config;
pub mod layout;
pub mod logging;
pub mod region;
pub mod status;
pub mod storage;

pub use capability::{Capability, CapabilitySet};
pub use layout::{Group, Item, LayoutConfig, LayoutError, LayoutListener, MapLayout};
pub use region::{RegionHierarchy, RegionIndex, RegionTree};
pub use status::Status;
pub use storage::{Progress, SimulatedStorage, StorageEngine, StorageEvent};
