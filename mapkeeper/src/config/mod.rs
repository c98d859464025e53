//! User configuration loaded from `~/.mapkeeper/config.ini`.
//!
//! The file is optional. Every setting has a default and any key present in
//! the file overrides it.
//!
//! ```ini
//! [catalog]
//! regions_file = ~/maps/regions.json
//! state_file = ~/maps/state.json
//!
//! [logging]
//! directory = ~/.mapkeeper/logs
//! file = mapkeeper.log
//! level = debug
//!
//! [layout]
//! verify_invariants = true
//! ```

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigError};
pub use settings::{
    CatalogSettings, ConfigFile, LayoutSettings, LoggingSettings, DEFAULT_LOG_FILE,
    DEFAULT_LOG_LEVEL,
};
