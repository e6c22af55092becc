//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - init: Init command arguments
//! - build: Build overrides, shared with archive
//! - archive: Archive command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod archive;
pub mod build;
pub mod completions;
pub mod init;

pub use archive::ArchiveArgs;
pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use init::InitArgs;

use crate::config::DEFAULT_CONFIG_FILE;

/// geth-builder - build go-ethereum with a custom plugin compiled in
#[derive(Parser, Debug)]
#[command(
    name = "geth-builder",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build go-ethereum with a custom plugin compiled in",
    long_about = "geth-builder clones go-ethereum, copies a local plugin package (such as a native \
                  tracer) into eth/tracers/native, registers it with a blank import in cmd/geth, \
                  and runs the upstream build tool.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  geth-builder init                        \x1b[90m# Write geth-builder.yaml\x1b[0m\n   \
                  geth-builder build                       \x1b[90m# Build geth into output_dir\x1b[0m\n   \
                  geth-builder build --geth.branch v1.14.0 \x1b[90m# Build from another branch\x1b[0m\n   \
                  geth-builder archive --type zip          \x1b[90m# Produce release archives\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "GETH_BUILDER_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Stream build tool output and log debug details
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitArgs),

    /// Build the geth binary with the plugin compiled in
    Build(BuildArgs),

    /// Build all tools and package geth as release archives
    Archive(ArchiveArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
