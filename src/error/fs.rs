//! File system errors

use std::path::Path;

use super::BuilderError;

/// Creates a copy failed error
pub fn copy_failed(
    from: impl Into<String>,
    to: impl Into<String>,
    reason: impl Into<String>,
) -> BuilderError {
    BuilderError::CopyFailed {
        from: from.into(),
        to: to.into(),
        reason: reason.into(),
    }
}

/// Creates a copy failed error from two paths and an IO error
pub fn copy_error(from: &Path, to: &Path, err: &std::io::Error) -> BuilderError {
    copy_failed(
        from.display().to_string(),
        to.display().to_string(),
        err.to_string(),
    )
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> BuilderError {
    BuilderError::IoError {
        message: message.into(),
    }
}
