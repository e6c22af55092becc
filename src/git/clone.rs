//! Fetching the upstream source tree

use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks, build::RepoBuilder};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use super::url::{is_local, normalize_clone_url};
use crate::error::{self, Result};

/// How [`ensure_source`] satisfied the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// A fresh checkout was cloned
    Cloned,
    /// The destination already existed and was used as is
    Existing,
}

/// Make sure a checkout of `url` at `branch` exists at `dest`.
///
/// An existing `dest` is trusted without checking its remote or revision.
/// Otherwise only `branch` is fetched, at depth 1 for remote URLs.
pub fn ensure_source(url: &str, branch: &str, dest: &Path) -> Result<SourceState> {
    if dest.exists() {
        tracing::info!(path = %dest.display(), "source directory exists, skipping clone");
        return Ok(SourceState::Existing);
    }

    tracing::info!(url, branch, path = %dest.display(), "cloning upstream source");
    clone_branch(url, branch, dest)?;
    Ok(SourceState::Cloned)
}

fn clone_branch(url: &str, branch: &str, dest: &Path) -> Result<()> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if !is_local(url) {
        fetch_options.depth(1);
    }

    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    let mut builder = RepoBuilder::new();
    builder
        .branch(branch)
        .fetch_options(fetch_options)
        .remote_create(move |repo, name, url| repo.remote_with_fetch(name, url, &refspec));

    builder
        .clone(&normalize_clone_url(url), dest)
        .map_err(|e| error::git::clone_failed(url, interpret_git_error(&e)))?;
    Ok(())
}
