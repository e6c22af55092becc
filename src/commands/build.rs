//! Build command: produce a geth binary with the plugin compiled in

use std::path::Path;

use console::style;

use crate::cli::BuildArgs;
use crate::config::{ArchiveKind, BuildRequest, BuilderConfig, Overrides};
use crate::error::Result;
use crate::operations::BuildOperation;
use crate::ui;

pub fn run(config_path: &Path, verbose: bool, args: &BuildArgs) -> Result<()> {
    let config = BuilderConfig::load(config_path)?;
    let request = BuildRequest::new(&config, &Overrides::from(args), ArchiveKind::None, verbose)?;
    tracing::debug!(?request, "build request");

    let mut reporter = ui::reporter(verbose);
    let binary = BuildOperation::new(&request, reporter.as_mut()).run_build()?;

    println!(
        "{} geth built with plugin {}: {}",
        style("✔").green().bold(),
        style(request.plugin_name()).cyan(),
        style(binary.display()).bold()
    );
    Ok(())
}
