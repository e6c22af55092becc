//! Repository URL handling for libgit2

use std::borrow::Cow;
use std::path::Path;

/// Rewrite `url` into a form libgit2 accepts.
///
/// SCP-style `git@host:owner/repo` becomes `ssh://git@host/owner/repo`, and a
/// relative or backslashed `file://` URL becomes an absolute `file:///` one.
/// Anything else passes through unchanged.
pub fn normalize_clone_url(url: &str) -> Cow<'_, str> {
    if let Some(rest) = url.strip_prefix("file://") {
        let rest = rest.replace('\\', "/");
        return if rest.starts_with('/') && !url.contains('\\') {
            Cow::Borrowed(url)
        } else {
            Cow::Owned(format!("file:///{}", rest.trim_start_matches('/')))
        };
    }

    if is_scp_style(url) {
        if let Some((host, path)) = url.split_once(':') {
            let path = path.trim_start_matches('/');
            return Cow::Owned(format!("ssh://{host}/{path}"));
        }
    }

    Cow::Borrowed(url)
}

/// `user@host:path` without a scheme
fn is_scp_style(url: &str) -> bool {
    !url.contains("://")
        && url
            .split_once(':')
            .is_some_and(|(host, _)| host.contains('@') && !host.contains('/'))
}

/// Whether `url` points at the local file system. Shallow fetches are not
/// supported by libgit2's local transport.
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute() || url.starts_with('.')
}
