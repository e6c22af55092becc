//! geth-builder - build go-ethereum with a custom plugin compiled in
//!
//! Clones go-ethereum, injects a local Go package (typically a native tracer)
//! into its source tree, registers it with a blank import in `cmd/geth`, and
//! drives the upstream build tool to produce a binary or release archives.

use clap::Parser;
use console::style;
use miette::Diagnostic;

mod builder;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod git;
mod logging;
mod operations;
mod transform;
mod ui;

use cli::{Cli, Commands};
use error::BuilderError;

/// Print `err` with its diagnostic code, help text and any captured build output.
fn report(err: &BuilderError) {
    eprintln!("{} {err}", style("Error:").red().bold());
    if let Some(code) = err.code() {
        eprintln!("  {} {code}", style("code:").dim());
    }
    if let Some(help) = err.help() {
        eprintln!("  {} {help}", style("help:").cyan());
    }
    if let Some(output) = err.tool_output().filter(|out| !out.trim().is_empty()) {
        eprintln!();
        eprintln!("{}", style("Build output (last lines):").bold());
        eprintln!("{output}");
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Init(args) => commands::init::run(&cli.config, args),
        Commands::Build(args) => commands::build::run(&cli.config, cli.verbose, args),
        Commands::Archive(args) => commands::archive::run(&cli.config, cli.verbose, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}
