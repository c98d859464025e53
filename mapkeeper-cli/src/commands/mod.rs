//! CLI command implementations.
//!
//! - [`list`] - Show the grouped layout built from the on-disk state
//! - [`simulate`] - Replay a script against the simulated storage engine

pub mod common;
pub mod list;
pub mod simulate;
