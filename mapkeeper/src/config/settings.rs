//! Settings structs and their defaults.

use std::path::PathBuf;

use crate::layout::LayoutConfig;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "mapkeeper.log";

/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
    pub layout: LayoutSettings,
}

/// `[catalog]`: where the region hierarchy and the on-disk state come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSettings {
    /// JSON region hierarchy.
    pub regions_file: Option<PathBuf>,
    /// JSON list of installed regions.
    pub state_file: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
    /// Filter directive, e.g. `info` or `mapkeeper=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: crate::logging::default_log_dir(),
            file: DEFAULT_LOG_FILE.to_string(),
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `[layout]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSettings {
    pub verify_invariants: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            verify_invariants: LayoutConfig::default().verify_invariants,
        }
    }
}

impl ConfigFile {
    /// The [`LayoutConfig`] described by the `[layout]` section.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig::new().with_verify_invariants(self.layout.verify_invariants)
    }
}
