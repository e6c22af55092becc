//! Command implementations for the geth-builder CLI

pub mod archive;
pub mod build;
pub mod completions;
pub mod init;
pub mod version;
