//! Git operations for fetching the upstream source
//!
//! This module handles:
//! - Shallow, single-branch clones over HTTPS, SSH and local paths
//! - Authentication via git's native credential system
//! - Translating libgit2 errors into readable reasons
//!
//! Authentication is delegated to ssh-agent, keys in `~/.ssh/` and git
//! credential helpers.

mod auth;
mod clone;
mod error;
mod url;

pub use clone::{SourceState, ensure_source};
