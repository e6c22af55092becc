//! Driving go-ethereum's own build tool (`build/ci.go`)
//!
//! Invocation grammar:
//!
//! ```text
//! <go> run build/ci.go install [--arch A] [package]
//! <go> run build/ci.go archive [--arch A] --type T package
//! ```

pub mod artifacts;
pub mod process;

use std::path::Path;

pub use artifacts::extract_archives;
pub use process::{Captured, ToolCommand};

use crate::config::{ArchiveKind, BuildRequest};

/// Script inside the go-ethereum tree that wraps `go build`
pub const CI_SCRIPT: &str = "build/ci.go";

/// Package path of the geth command
pub const GETH_PACKAGE: &str = "./cmd/geth";

/// Invokes the build tool for one [`BuildRequest`]
pub struct BuildTool<'a> {
    request: &'a BuildRequest,
}

impl<'a> BuildTool<'a> {
    pub fn new(request: &'a BuildRequest) -> Self {
        Self { request }
    }

    fn command(&self, step: &str, tail: &[&str]) -> ToolCommand {
        let mut args = vec!["run".to_string(), CI_SCRIPT.to_string(), step.to_string()];
        if let Some(arch) = &self.request.arch {
            args.push("--arch".to_string());
            args.push(arch.clone());
        }
        args.extend(tail.iter().map(|s| (*s).to_string()));

        let mut envs = Vec::new();
        if !self.request.build_flags.trim().is_empty() {
            envs.push(("GOFLAGS".to_string(), self.request.build_flags.clone()));
        }

        ToolCommand {
            program: self.request.go_binary.clone(),
            args,
            dir: self.request.source_dir.clone(),
            envs,
        }
    }

    /// `ci.go install`, for one package or everything when `package` is `None`
    pub fn install_command(&self, package: Option<&str>) -> ToolCommand {
        self.command("install", package.as_slice())
    }

    /// `ci.go archive --type <kind> <package>`; `None` for [`ArchiveKind::None`]
    pub fn archive_command(&self, package: &str, kind: ArchiveKind) -> Option<ToolCommand> {
        let kind = kind.as_arg()?;
        Some(self.command("archive", &["--type", kind, package]))
    }

    fn execute(&self, command: &ToolCommand) -> crate::error::Result<Captured> {
        process::run(command, self.request.verbose, self.request.timeout)
    }

    /// Compile `package` (or every tool) into `build/bin`.
    pub fn install(&self, package: Option<&str>) -> crate::error::Result<Captured> {
        let command = self.install_command(package);
        tracing::info!(command = %command, "building");
        self.execute(&command)
    }

    /// Build every tool, then package `package` as the requested archive
    /// kind. Returns the archive file names, relative to the source directory.
    pub fn archive(&self, package: &str) -> crate::error::Result<Vec<String>> {
        // The archive step bundles all tool binaries, so they must exist first.
        self.install(None)?;

        let Some(command) = self.archive_command(package, self.request.archive) else {
            return Ok(Vec::new());
        };
        tracing::info!(command = %command, "archiving");
        let captured = self.execute(&command)?;
        let product = product_name(package);
        let archives = extract_archives(&captured.combined(), product)?;
        if archives.is_empty() {
            return Err(crate::error::build::no_artifacts(product, captured.tail()));
        }
        Ok(archives)
    }
}

/// Final path element of a Go package path, e.g. `geth` for `./cmd/geth`
pub fn product_name(package: &str) -> &str {
    Path::new(package)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(package)
}
