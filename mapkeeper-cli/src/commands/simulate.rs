//! `mapkeeper simulate`: replay user requests and storage events.
//!
//! A script is a JSON list of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "download", "region": "Nepal", "capabilities": ["base_map"] },
//!   { "op": "start", "region": "Nepal" },
//!   { "op": "progress", "region": "Nepal", "downloaded": 1024, "total": 4096 },
//!   { "op": "complete", "region": "Nepal" },
//!   { "op": "update_all" }
//! ]
//! ```
//!
//! Engine events are applied to the layout after every step and each
//! listener notification is printed.

use std::path::Path;
use std::sync::Arc;

use console::style;
use mapkeeper::config::ConfigFile;
use mapkeeper::layout::{LayoutEvent, QueueingListener};
use mapkeeper::{CapabilitySet, LayoutConfig, LayoutError, MapLayout, Progress};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use super::common::{print_groups, read_json, Catalog, CatalogArgs};
use crate::error::CliError;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// User asks to download a region.
    Download {
        region: String,
        #[serde(default = "CapabilitySet::base_map")]
        capabilities: CapabilitySet,
    },
    /// User asks to delete content of a region.
    Delete {
        region: String,
        #[serde(default = "CapabilitySet::all")]
        capabilities: CapabilitySet,
    },
    /// User cancels a region's download.
    Cancel { region: String },
    /// User retries a region's download.
    Retry { region: String },
    /// User updates every out-of-date region.
    UpdateAll,
    /// User cancels every active download.
    CancelAll,
    /// Engine starts a queued download.
    Start { region: String },
    /// Engine reports download progress.
    Progress {
        region: String,
        downloaded: u64,
        total: u64,
    },
    /// Engine finishes a download.
    Complete { region: String },
    /// Engine fails a download.
    Fail { region: String },
    /// Engine finds a newer version of an installed region.
    Outdate { region: String },
}

/// Load the catalog and script, replay it and print the result.
pub fn run(args: &CatalogArgs, script: &Path, config: &ConfigFile) -> Result<(), CliError> {
    let catalog = Catalog::load(args, config)?;
    let steps: Vec<Step> = read_json(script)?;

    let mut simulation = Simulation::new(catalog, config.layout_config());
    for (number, step) in steps.iter().enumerate() {
        println!("{} {:?}", style(format!("[{}]", number + 1)).cyan(), step);
        for line in simulation.apply(number + 1, step)? {
            println!("    {}", line);
        }
    }

    println!();
    print_groups(&simulation.layout);
    Ok(())
}

/// A layout wired to a simulated engine with a queueing listener.
pub struct Simulation {
    catalog: Catalog,
    layout: MapLayout,
    notifications: UnboundedReceiver<LayoutEvent>,
}

impl Simulation {
    /// Build and initialize the layout for `catalog`.
    pub fn new(catalog: Catalog, config: LayoutConfig) -> Self {
        let mut layout = MapLayout::new(catalog.tree.clone(), catalog.storage.clone(), config);
        layout.initialize();
        let (listener, notifications) = QueueingListener::channel();
        layout.set_listener(Arc::new(listener));

        Self {
            catalog,
            layout,
            notifications,
        }
    }

    /// The layout being driven.
    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    /// Apply one step, then every engine event it caused.
    ///
    /// Returns a description of each resulting notification.
    pub fn apply(&mut self, number: usize, step: &Step) -> Result<Vec<String>, CliError> {
        let mut lines = Vec::new();
        let step_error = |error: LayoutError| CliError::Step {
            step: number,
            error,
        };
        let storage = &self.catalog.storage;

        match step {
            Step::Download {
                region,
                capabilities,
            } => {
                let index = self.catalog.resolve(region)?;
                self.layout
                    .request_download(&index, *capabilities)
                    .map_err(step_error)?;
            }
            Step::Delete {
                region,
                capabilities,
            } => {
                let index = self.catalog.resolve(region)?;
                self.layout
                    .request_delete(&index, *capabilities)
                    .map_err(step_error)?;
            }
            Step::Cancel { region } => {
                let index = self.catalog.resolve(region)?;
                let (group, position) = self
                    .layout
                    .locate(&index)
                    .ok_or_else(|| step_error(LayoutError::NotTracked(index.clone())))?;
                self.layout.cancel(group, position).map_err(step_error)?;
            }
            Step::Retry { region } => {
                let index = self.catalog.resolve(region)?;
                let (group, position) = self
                    .layout
                    .locate(&index)
                    .ok_or_else(|| step_error(LayoutError::NotTracked(index.clone())))?;
                self.layout.retry(group, position).map_err(step_error)?;
            }
            Step::UpdateAll => {
                let count = self.layout.update_all().map_err(step_error)?;
                lines.push(format!("{} update(s) requested", count));
            }
            Step::CancelAll => {
                let count = self.layout.cancel_all().map_err(step_error)?;
                lines.push(format!("{} download(s) cancelled", count));
            }
            Step::Start { region } => {
                let index = self.catalog.resolve(region)?;
                if !storage.start(&index) {
                    lines.push("ignored: nothing queued".to_string());
                }
            }
            Step::Progress {
                region,
                downloaded,
                total,
            } => {
                let index = self.catalog.resolve(region)?;
                storage.report_progress(&index, Progress::new(*downloaded, *total));
            }
            Step::Complete { region } => {
                let index = self.catalog.resolve(region)?;
                if !storage.complete(&index) {
                    lines.push("ignored: nothing pending".to_string());
                }
            }
            Step::Fail { region } => {
                let index = self.catalog.resolve(region)?;
                if !storage.fail(&index) {
                    lines.push("ignored: nothing pending".to_string());
                }
            }
            Step::Outdate { region } => {
                let index = self.catalog.resolve(region)?;
                if !storage.mark_out_of_date(&index) {
                    lines.push("ignored: region is not current".to_string());
                }
            }
        }

        if let Err(error) = self.layout.process_events() {
            warn!(step = number, error = %error, "Storage event rejected");
            return Err(step_error(error));
        }

        while let Ok(event) = self.notifications.try_recv() {
            lines.push(describe(&event));
        }
        Ok(lines)
    }
}

/// Human-readable form of a notification.
pub fn describe(event: &LayoutEvent) -> String {
    match event {
        LayoutEvent::Inserted { group, position } => {
            format!("inserted: {} #{}", group, position)
        }
        LayoutEvent::Deleted { group, position } => {
            format!("removed: {} #{}", group, position)
        }
        LayoutEvent::Moved { from, to } => {
            format!("moved: {} #{} -> {} #{}", from.0, from.1, to.0, to.1)
        }
        LayoutEvent::StatusChanged { group, position } => {
            format!("status changed: {} #{}", group, position)
        }
        LayoutEvent::CapabilitiesChanged { group, position } => {
            format!("capabilities changed: {} #{}", group, position)
        }
        LayoutEvent::Progress {
            group,
            position,
            progress,
        } => format!("progress: {} #{} {}", group, position, progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::StateEntry;
    use mapkeeper::region::{RegionNode, RegionTree};
    use mapkeeper::{Group, Status};

    fn simulation(state: &str) -> Simulation {
        let tree = RegionTree::new(vec![RegionNode::group(
            "Asia",
            vec![
                RegionNode::leaf("Japan"),
                RegionNode::leaf("Nepal"),
                RegionNode::leaf("Laos"),
            ],
        )]);
        let entries: Vec<StateEntry> = serde_json::from_str(state).unwrap();
        let catalog = Catalog::from_entries(tree, &entries).unwrap();
        Simulation::new(catalog, LayoutConfig::new().with_verify_invariants(true))
    }

    fn steps(json: &str) -> Vec<Step> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let parsed = steps(
            r#"[
                {"op": "download", "region": "Nepal"},
                {"op": "delete", "region": "Japan", "capabilities": ["routing_data"]},
                {"op": "progress", "region": "Nepal", "downloaded": 1, "total": 2},
                {"op": "cancel_all"}
            ]"#,
        );

        assert_eq!(
            parsed,
            vec![
                Step::Download {
                    region: "Nepal".to_string(),
                    capabilities: CapabilitySet::base_map(),
                },
                Step::Delete {
                    region: "Japan".to_string(),
                    capabilities: mapkeeper::Capability::RoutingData.into(),
                },
                Step::Progress {
                    region: "Nepal".to_string(),
                    downloaded: 1,
                    total: 2,
                },
                Step::CancelAll,
            ]
        );
    }

    #[test]
    fn test_download_script_reaches_up_to_date() {
        let mut sim = simulation("[]");
        let script = steps(
            r#"[
                {"op": "download", "region": "Nepal"},
                {"op": "start", "region": "Nepal"},
                {"op": "complete", "region": "Nepal"}
            ]"#,
        );

        let transcript: Vec<Vec<String>> = script
            .iter()
            .enumerate()
            .map(|(n, step)| sim.apply(n + 1, step).unwrap())
            .collect();

        assert_eq!(transcript[0][0], "inserted: new #0");
        assert!(transcript[2].contains(&"moved: new #0 -> up to date #0".to_string()));
        assert_eq!(sim.layout().count_in_group(Group::UpToDate), 1);
        assert_eq!(sim.layout().status(Group::UpToDate, 0).unwrap(), Status::OnDisk);
    }

    #[test]
    fn test_engine_step_without_pending_download_is_ignored() {
        let mut sim = simulation("[]");

        let step = Step::Complete {
            region: "Laos".to_string(),
        };
        let lines = sim.apply(1, &step).unwrap();

        assert_eq!(lines, vec!["ignored: nothing pending"]);
    }

    #[test]
    fn test_rejected_request_reports_step() {
        let mut sim = simulation(r#"[{"region": "Japan", "status": "on_disk"}]"#);

        let result = sim.apply(
            4,
            &Step::Retry {
                region: "Japan".to_string(),
            },
        );

        assert!(matches!(
            result,
            Err(CliError::Step {
                step: 4,
                error: LayoutError::NothingToRetry(_)
            })
        ));
    }

    #[test]
    fn test_update_all_counts_requests() {
        let mut sim = simulation(
            r#"[
                {"region": "Japan", "status": "on_disk_out_of_date"},
                {"region": "Laos", "status": "on_disk_out_of_date", "capabilities": ["base_map", "routing_data"]}
            ]"#,
        );

        let lines = sim.apply(1, &Step::UpdateAll).unwrap();

        assert_eq!(lines[0], "2 update(s) requested");
        assert!(sim.layout().is_any_download_active());
    }

    #[test]
    fn test_demo_script_runs() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos");
        let args = CatalogArgs {
            regions: Some(demos.join("regions.json")),
            state: Some(demos.join("state.json")),
        };
        let catalog = Catalog::load(&args, &ConfigFile::default()).unwrap();
        let script: Vec<Step> = read_json(&demos.join("script.json")).unwrap();

        let mut sim = Simulation::new(catalog, LayoutConfig::new().with_verify_invariants(true));
        for (n, step) in script.iter().enumerate() {
            sim.apply(n + 1, step).unwrap();
        }

        let layout = sim.layout();
        assert!(!layout.is_any_download_active());
        assert_eq!(layout.count_in_group(Group::New), 1);
        assert_eq!(layout.name(Group::New, 0).unwrap(), "Portugal");
        assert_eq!(layout.name(Group::OutOfDate, 0).unwrap(), "Japan");
        assert_eq!(
            layout.group_items(Group::UpToDate).len(),
            2,
            "France and Germany stay current"
        );
    }
}
