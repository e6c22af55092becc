//! Entry-point patching errors

use super::BuilderError;

/// Creates an entry point read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::EntryPointReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an entry point parse failed error
pub fn parse_failed(
    path: impl Into<String>,
    line: usize,
    column: usize,
    reason: impl Into<String>,
) -> BuilderError {
    BuilderError::EntryPointParseFailed {
        path: path.into(),
        line,
        column,
        reason: reason.into(),
    }
}

/// Creates an entry point write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::EntryPointWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn invalid_import_path(import_path: impl Into<String>) -> BuilderError {
    BuilderError::InvalidImportPath {
        import_path: import_path.into(),
    }
}

/// Creates an error for a rendered file that fails to re-parse
pub fn failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::TransformFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
