//! Configuration errors

use super::BuilderError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> BuilderError {
    BuilderError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> BuilderError {
    BuilderError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config already exists error
pub fn already_exists(path: impl Into<String>) -> BuilderError {
    BuilderError::ConfigAlreadyExists { path: path.into() }
}
