//! Archive command: build all tools and package geth for release

use std::path::Path;

use console::style;

use crate::cli::ArchiveArgs;
use crate::config::{BuildRequest, BuilderConfig, Overrides};
use crate::error::Result;
use crate::operations::BuildOperation;
use crate::ui;

pub fn run(config_path: &Path, verbose: bool, args: &ArchiveArgs) -> Result<()> {
    let config = BuilderConfig::load(config_path)?;
    let request = BuildRequest::new(&config, &Overrides::from(&args.build), args.kind, verbose)?;
    tracing::debug!(?request, "archive request");

    let mut reporter = ui::reporter(verbose);
    let archives = BuildOperation::new(&request, reporter.as_mut()).run_archive()?;

    println!(
        "{} {} archive(s) written to {}",
        style("✔").green().bold(),
        archives.len(),
        style(request.output_dir.display()).bold()
    );
    for archive in &archives {
        println!("  {}", archive.display());
    }
    Ok(())
}
