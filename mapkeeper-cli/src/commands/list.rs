//! `mapkeeper list`: show the layout built from the on-disk state.

use mapkeeper::config::ConfigFile;
use mapkeeper::MapLayout;

use super::common::{print_groups, Catalog, CatalogArgs};
use crate::error::CliError;

/// Build the layout from the catalog and print its groups.
pub fn run(args: &CatalogArgs, config: &ConfigFile) -> Result<(), CliError> {
    let catalog = Catalog::load(args, config)?;
    let mut layout = MapLayout::new(catalog.tree, catalog.storage, config.layout_config());
    layout.initialize();

    print_groups(&layout);
    Ok(())
}
