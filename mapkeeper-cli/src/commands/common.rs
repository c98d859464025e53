//! Loading fixtures shared across CLI commands.
//!
//! A layout is built from two JSON files:
//! - a region hierarchy, as accepted by [`RegionTree::load`]
//! - the on-disk state, a list of installed regions:
//!
//! ```json
//! [
//!   { "region": "Germany", "status": "on_disk_out_of_date", "capabilities": ["base_map", "routing_data"] },
//!   { "region": "0.1", "status": "on_disk", "capabilities": ["base_map"] }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use mapkeeper::config::ConfigFile;
use mapkeeper::region::RegionTree;
use mapkeeper::{CapabilitySet, Group, MapLayout, RegionIndex, SimulatedStorage, Status};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;

/// Where to find the region hierarchy and on-disk state.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// JSON region hierarchy (default: catalog.regions_file from config)
    #[arg(long)]
    pub regions: Option<PathBuf>,

    /// JSON list of installed regions (default: catalog.state_file from config)
    #[arg(long)]
    pub state: Option<PathBuf>,
}

/// One installed region in a state file.
#[derive(Debug, Clone, Deserialize)]
pub struct StateEntry {
    /// Region name or dot-separated index.
    pub region: String,
    pub status: Status,
    #[serde(default = "CapabilitySet::base_map")]
    pub capabilities: CapabilitySet,
}

/// A region hierarchy with a simulated engine seeded from the on-disk state.
pub struct Catalog {
    pub tree: Arc<RegionTree>,
    pub storage: Arc<SimulatedStorage>,
}

impl Catalog {
    /// Load the files named on the command line, falling back to config.
    pub fn load(args: &CatalogArgs, config: &ConfigFile) -> Result<Self, CliError> {
        // CLI takes precedence, then config
        let regions = args
            .regions
            .clone()
            .or_else(|| config.catalog.regions_file.clone())
            .ok_or_else(|| CliError::MissingSetting("catalog.regions_file".to_string()))?;
        let state = args
            .state
            .clone()
            .or_else(|| config.catalog.state_file.clone());

        let tree = RegionTree::load(&regions)?;
        let entries = match &state {
            Some(path) => read_json::<Vec<StateEntry>>(path)?,
            None => Vec::new(),
        };
        Self::from_entries(tree, &entries)
    }

    /// Seed a simulated engine with `entries`.
    pub fn from_entries(tree: RegionTree, entries: &[StateEntry]) -> Result<Self, CliError> {
        let storage = SimulatedStorage::new();
        for entry in entries {
            let index = resolve(&tree, &entry.region)?;
            if !entry.status.is_on_disk() {
                return Err(CliError::Fixture {
                    path: PathBuf::from("state"),
                    reason: format!(
                        "region '{}' has status '{}', installed regions must be on disk",
                        entry.region, entry.status
                    ),
                });
            }
            storage.install(&index, entry.status, entry.capabilities.for_download());
        }
        debug!(installed = entries.len(), "Simulated storage seeded");

        Ok(Self {
            tree: Arc::new(tree),
            storage: Arc::new(storage),
        })
    }

    /// Resolve a region name or index.
    pub fn resolve(&self, name_or_index: &str) -> Result<RegionIndex, CliError> {
        resolve(&self.tree, name_or_index)
    }
}

fn resolve(tree: &RegionTree, name_or_index: &str) -> Result<RegionIndex, CliError> {
    tree.resolve(name_or_index)
        .ok_or_else(|| CliError::UnknownRegion(name_or_index.to_string()))
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let fixture_error = |reason: String| CliError::Fixture {
        path: path.to_path_buf(),
        reason,
    };
    let json = fs::read_to_string(path).map_err(|e| fixture_error(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| fixture_error(e.to_string()))
}

/// One line per item: name, status and installed capabilities.
pub fn group_lines(layout: &MapLayout, group: Group) -> Vec<String> {
    let hierarchy = layout.hierarchy();
    layout
        .group_items(group)
        .iter()
        .map(|item| {
            format!(
                "{:<24} {:<22} {}",
                hierarchy.display_name(&item.index),
                item.status,
                item.installed
            )
        })
        .collect()
}

/// Print every group with a styled header.
pub fn print_groups(layout: &MapLayout) {
    for group in Group::ALL {
        println!(
            "{} ({})",
            style(group.name()).bold().underlined(),
            layout.count_in_group(group)
        );
        for line in group_lines(layout, group) {
            println!("  {}", line);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapkeeper::region::RegionNode;
    use mapkeeper::{LayoutConfig, StorageEngine};

    fn tree() -> RegionTree {
        RegionTree::new(vec![RegionNode::group(
            "Europe",
            vec![RegionNode::leaf("Germany"), RegionNode::leaf("France")],
        )])
    }

    fn entries(json: &str) -> Vec<StateEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_entries_seed_storage() {
        let catalog = Catalog::from_entries(
            tree(),
            &entries(
                r#"[
                    {"region": "Germany", "status": "on_disk_out_of_date", "capabilities": ["base_map", "routing_data"]},
                    {"region": "0.1", "status": "on_disk"}
                ]"#,
            ),
        )
        .unwrap();

        let germany = catalog.resolve("germany").unwrap();
        let france = catalog.resolve("France").unwrap();
        assert_eq!(
            catalog.storage.query_status(&germany),
            (Status::OnDiskOutOfDate, CapabilitySet::all())
        );
        assert_eq!(
            catalog.storage.query_status(&france),
            (Status::OnDisk, CapabilitySet::base_map())
        );
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let result = Catalog::from_entries(
            tree(),
            &entries(r#"[{"region": "Atlantis", "status": "on_disk"}]"#),
        );
        assert!(matches!(result, Err(CliError::UnknownRegion(name)) if name == "Atlantis"));
    }

    #[test]
    fn test_transient_state_is_rejected() {
        let result = Catalog::from_entries(
            tree(),
            &entries(r#"[{"region": "France", "status": "downloading"}]"#),
        );
        assert!(matches!(result, Err(CliError::Fixture { .. })));
    }

    #[test]
    fn test_load_requires_regions_file() {
        let result = Catalog::load(&CatalogArgs::default(), &ConfigFile::default());
        assert!(matches!(result, Err(CliError::MissingSetting(_))));
    }

    #[test]
    fn test_load_from_files() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let regions = temp_dir.path().join("regions.json");
        let state = temp_dir.path().join("state.json");
        fs::write(
            &regions,
            r#"{"name": "World", "children": [{"name": "Chile"}, {"name": "Peru"}]}"#,
        )
        .unwrap();
        fs::write(&state, r#"[{"region": "Peru", "status": "on_disk"}]"#).unwrap();

        let args = CatalogArgs {
            regions: Some(regions),
            state: Some(state),
        };
        let catalog = Catalog::load(&args, &ConfigFile::default()).unwrap();
        let mut layout = MapLayout::new(
            catalog.tree.clone(),
            catalog.storage.clone(),
            LayoutConfig::default(),
        );
        layout.initialize();

        assert_eq!(layout.count_in_group(Group::UpToDate), 1);
        let lines = group_lines(&layout, Group::UpToDate);
        assert!(lines[0].starts_with("Peru"));
        assert!(lines[0].ends_with("map"));
    }
}
