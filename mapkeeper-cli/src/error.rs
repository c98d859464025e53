//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use mapkeeper::config::ConfigError;
use mapkeeper::region::RegionTreeError;
use mapkeeper::LayoutError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigError),
    /// A required setting is missing
    MissingSetting(String),
    /// Region hierarchy could not be loaded
    Regions(RegionTreeError),
    /// A state or script file could not be read or parsed
    Fixture { path: PathBuf, reason: String },
    /// A fixture names a region the hierarchy does not contain
    UnknownRegion(String),
    /// A scripted request was rejected by the layout
    Step { step: usize, error: LayoutError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::MissingSetting(_) = self {
            eprintln!();
            eprintln!(
                "Set it in {} or pass it on the command line.",
                mapkeeper::config::config_file_path().display()
            );
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::MissingSetting(name) => write!(f, "No {} configured", name),
            CliError::Regions(e) => write!(f, "Failed to load regions: {}", e),
            CliError::Fixture { path, reason } => {
                write!(f, "Failed to load '{}': {}", path.display(), reason)
            }
            CliError::UnknownRegion(name) => write!(f, "Unknown region '{}'", name),
            CliError::Step { step, error } => write!(f, "Script step {} failed: {}", step, error),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Regions(e) => Some(e),
            CliError::Step { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<RegionTreeError> for CliError {
    fn from(e: RegionTreeError) -> Self {
        CliError::Regions(e)
    }
}
