//! Init command: write a starter configuration file

use std::path::Path;

use console::style;

use crate::cli::InitArgs;
use crate::config::write_default;
use crate::error::Result;

pub fn run(config_path: &Path, args: &InitArgs) -> Result<()> {
    write_default(config_path, args.force)?;
    tracing::debug!(
        path = %config_path.display(),
        force = args.force,
        "wrote default configuration"
    );
    println!(
        "{} Created {}",
        style("✔").green(),
        style(config_path.display()).bold()
    );
    println!("Edit plugin_path to point at your plugin package, then run 'geth-builder build'.");
    Ok(())
}
