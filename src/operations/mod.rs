//! High-level operations
//!
//! [`BuildOperation`] coordinates:
//! - Source fetch (from git module)
//! - Plugin injection (from common::fs)
//! - Entry-point patching (from transform module)
//! - Build tool invocation (from builder module)
//! - UI: stage reporting (from ui module)

pub mod build;

pub use build::BuildOperation;
