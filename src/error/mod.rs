//! Error types and handling for geth-builder
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by pipeline stage:
//! - [`config`]: Configuration errors
//! - [`git`]: Source fetch errors
//! - [`fs`]: Copy and file system errors
//! - [`transform`]: Entry-point patching errors
//! - [`build`]: Build tool errors

pub mod build;
pub mod config;
pub mod fs;
pub mod git;
pub mod transform;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for geth-builder operations
#[derive(Error, Diagnostic, Debug)]
pub enum BuilderError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(geth_builder::config::not_found),
        help("Run 'geth-builder init' to create a default configuration file")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(geth_builder::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(geth_builder::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(geth_builder::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(geth_builder::config::already_exists),
        help("Pass --force to overwrite it")
    )]
    ConfigAlreadyExists { path: String },

    // Fetch errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(geth_builder::git::clone_failed),
        help("Check that the URL and branch are correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    // Copy errors
    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(code(geth_builder::fs::copy_failed))]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(geth_builder::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(geth_builder::fs::io_error))]
    IoError { message: String },

    // Transform errors
    #[error("Failed to read entry point: {path}: {reason}")]
    #[diagnostic(code(geth_builder::transform::read_failed))]
    EntryPointReadFailed { path: String, reason: String },

    #[error("Failed to parse entry point: {path}:{line}:{column}: {reason}")]
    #[diagnostic(
        code(geth_builder::transform::parse_failed),
        help(
            "The upstream entry point is not valid Go source; check the configured branch or remove the source directory to re-clone"
        )
    )]
    EntryPointParseFailed {
        path: String,
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Failed to write entry point: {path}: {reason}")]
    #[diagnostic(code(geth_builder::transform::write_failed))]
    EntryPointWriteFailed { path: String, reason: String },

    #[error("Invalid import path: {import_path:?}")]
    #[diagnostic(
        code(geth_builder::transform::invalid_import_path),
        help("Plugin directory names must form a valid Go import path")
    )]
    InvalidImportPath { import_path: String },

    #[error("Patched entry point no longer parses: {path}: {reason}")]
    #[diagnostic(code(geth_builder::transform::failed))]
    TransformFailed { path: String, reason: String },

    // Build errors
    #[error("Failed to start build tool '{program}': {reason}")]
    #[diagnostic(
        code(geth_builder::build::spawn_failed),
        help("Make sure the Go toolchain is installed and on PATH, or set go_binary")
    )]
    BuildSpawnFailed { program: String, reason: String },

    #[error("Build command failed ({status}): {command}")]
    #[diagnostic(code(geth_builder::build::failed))]
    BuildFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("Build command timed out after {seconds}s: {command}")]
    #[diagnostic(code(geth_builder::build::timed_out))]
    BuildTimedOut {
        command: String,
        seconds: u64,
        output: String,
    },

    #[error("Build succeeded but no {product} archives were found in its output")]
    #[diagnostic(
        code(geth_builder::build::no_artifacts),
        help("The build tool's output format may have changed; its output is shown below")
    )]
    NoArtifacts { product: String, output: String },
}

impl BuilderError {
    /// Tail of the build tool's output, for errors raised after it ran
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            BuilderError::BuildFailed { output, .. }
            | BuilderError::BuildTimedOut { output, .. }
            | BuilderError::NoArtifacts { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuilderError {
    fn from(err: std::io::Error) -> Self {
        BuilderError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BuilderError>;
