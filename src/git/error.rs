//! Turning libgit2 failures into short, actionable reasons

use git2::{Error, ErrorClass, ErrorCode};

/// Message fragments and the reason they map to; first match wins
const REASONS: &[(&[&str], &str)] = &[
    (&["remote branch", "revspec"], "Branch not found"),
    (
        &["not found", "404", "too many redirects", "authentication replays"],
        "Repository not found",
    ),
    (&["authentication", "credentials"], "Authentication failed"),
    (&["permission denied", "access denied"], "Permission denied"),
    (
        &["connection", "network", "resolve", "timeout", "timed out"],
        "Network error",
    ),
    (&["certificate"], "Certificate error"),
    (&["ssl", "tls"], "SSL error"),
];

/// Interpret a git2 error as a user-facing reason, keeping libgit2's own
/// message when no category fits.
pub fn interpret_git_error(err: &Error) -> String {
    if err.code() == ErrorCode::Auth {
        return "Authentication failed".to_string();
    }

    let message = err.message().to_lowercase();
    let category = REASONS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| message.contains(needle)))
        .map(|(_, reason)| *reason);

    match (category, err.class()) {
        (Some(reason), _) => format!("{reason}: {}", err.message()),
        (None, ErrorClass::Http) => format!("HTTP error: {}", err.message()),
        (None, ErrorClass::Ssh) => format!("SSH error: {}", err.message()),
        (None, _) => err.message().to_string(),
    }
}
