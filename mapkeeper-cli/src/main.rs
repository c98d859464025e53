//! Mapkeeper CLI - Command-line interface
//!
//! Drives the mapkeeper library against the simulated storage engine.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mapkeeper::config::ConfigFile;
use mapkeeper::logging;

use commands::common::CatalogArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "mapkeeper")]
#[command(version, about = "Inspect and simulate offline map region layouts", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.mapkeeper/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show installed regions grouped into new, out of date and up to date
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Replay a script of user requests and storage events
    Simulate {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// JSON script of steps to replay
        #[arg(long)]
        script: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let _logging_guard = logging::init_logging(
        &config.logging.directory,
        &config.logging.file,
        &config.logging.level,
    )
    .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    match cli.command {
        Commands::List { catalog } => commands::list::run(&catalog, &config),
        Commands::Simulate { catalog, script } => {
            commands::simulate::run(&catalog, &script, &config)
        }
    }
}
