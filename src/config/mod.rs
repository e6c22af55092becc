//! Configuration handling for geth-builder
//!
//! This module contains:
//! - `geth-builder.yaml` - the configuration file
//! - [`BuildRequest`] - file values merged with command-line overrides

pub mod file;
pub mod request;

pub use file::{BuilderConfig, DEFAULT_CONFIG_FILE, write_default};
pub use request::{ArchiveKind, BuildRequest, Overrides};
