//! Build tool errors

use super::BuilderError;

/// Creates a spawn failed error
pub fn spawn_failed(program: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::BuildSpawnFailed {
        program: program.into(),
        reason: reason.into(),
    }
}

/// Creates a build failed error carrying the captured diagnostic output
pub fn failed(
    command: impl Into<String>,
    status: impl Into<String>,
    output: impl Into<String>,
) -> BuilderError {
    BuilderError::BuildFailed {
        command: command.into(),
        status: status.into(),
        output: output.into(),
    }
}

/// Creates a timed out error with the output produced before the kill
pub fn timed_out(
    command: impl Into<String>,
    seconds: u64,
    output: impl Into<String>,
) -> BuilderError {
    BuilderError::BuildTimedOut {
        command: command.into(),
        seconds,
        output: output.into(),
    }
}

/// Creates a no artifacts error with the archive step's output
pub fn no_artifacts(product: impl Into<String>, output: impl Into<String>) -> BuilderError {
    BuilderError::NoArtifacts {
        product: product.into(),
        output: output.into(),
    }
}
