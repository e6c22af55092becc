//! Source fetch errors

use super::BuilderError;

/// Creates a clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}
