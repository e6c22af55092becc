//! The build pipeline: fetch, inject, patch, build, extract
//!
//! Every stage runs in order on the calling thread. The first failure stops
//! the run; nothing already written to the source tree is rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::{BuildTool, GETH_PACKAGE};
use crate::common::fs::{copy_file, copy_tree, strip_manifests};
use crate::config::BuildRequest;
use crate::error::{self, Result};
use crate::git::{SourceState, ensure_source};
use crate::transform::{PatchOutcome, add_import_to_file, is_valid_import_path};
use crate::ui::StageReporter;

/// Go module path of go-ethereum
pub const GETH_MODULE: &str = "github.com/ethereum/go-ethereum";

/// Where plugins are placed inside the source tree
pub const PLUGIN_PARENT: [&str; 3] = ["eth", "tracers", "native"];

/// Entry point that receives the blank import
pub const ENTRY_POINT: [&str; 3] = ["cmd", "geth", "main.go"];

/// Import path under which the plugin named `plugin` is compiled
pub fn plugin_import_path(plugin: &str) -> String {
    let mut path = GETH_MODULE.to_string();
    for segment in PLUGIN_PARENT.iter().copied().chain([plugin]) {
        path.push('/');
        path.push_str(segment);
    }
    path
}

fn join_all(base: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(base.to_path_buf(), |path, s| path.join(s))
}

/// Runs the pipeline for one request
pub struct BuildOperation<'a> {
    request: &'a BuildRequest,
    reporter: &'a mut dyn StageReporter,
}

impl<'a> BuildOperation<'a> {
    pub fn new(request: &'a BuildRequest, reporter: &'a mut dyn StageReporter) -> Self {
        Self { request, reporter }
    }

    fn stage<T>(
        &mut self,
        name: &str,
        done: impl FnOnce(&T) -> String,
        run: impl FnOnce(&BuildRequest) -> Result<T>,
    ) -> Result<T> {
        self.reporter.start(name);
        match run(self.request) {
            Ok(value) => {
                self.reporter.finish(&done(&value));
                Ok(value)
            }
            Err(err) => {
                self.reporter.abandon();
                tracing::debug!(stage = name, error = %err, "stage failed");
                Err(err)
            }
        }
    }

    /// Fetch the source, inject the plugin and patch the entry point.
    pub fn prepare_source(&mut self) -> Result<()> {
        let plugin = self.request.plugin_name();
        let import_path = plugin_import_path(&plugin);
        if !is_valid_import_path(&import_path) {
            return Err(error::transform::invalid_import_path(import_path));
        }
        if !self.request.plugin_dir.is_dir() {
            return Err(error::config::invalid(format!(
                "plugin directory not found: {}",
                self.request.plugin_dir.display()
            )));
        }
        if self.request.source_dir.starts_with(&self.request.plugin_dir) {
            return Err(error::config::invalid(format!(
                "source_dir {} is inside the plugin directory {}",
                self.request.source_dir.display(),
                self.request.plugin_dir.display()
            )));
        }

        self.stage(
            "Fetching go-ethereum",
            |state: &SourceState| match state {
                SourceState::Cloned => "Cloned go-ethereum".to_string(),
                SourceState::Existing => "Using existing go-ethereum checkout".to_string(),
            },
            |req| ensure_source(&req.repository_url, &req.branch, &req.source_dir),
        )?;

        self.stage(
            "Injecting plugin",
            |root: &PathBuf| format!("Injected plugin into {}", root.display()),
            |req| {
                let parent = join_all(&req.source_dir, &PLUGIN_PARENT);
                fs::create_dir_all(&parent).map_err(|e| {
                    error::fs::write_failed(parent.display().to_string(), e.to_string())
                })?;
                let root = copy_tree(&req.plugin_dir, &parent)?;
                for removed in strip_manifests(&root)? {
                    tracing::debug!(file = removed, "removed module manifest from plugin");
                }
                Ok(root)
            },
        )?;

        self.stage(
            "Patching entry point",
            |outcome: &PatchOutcome| match outcome {
                PatchOutcome::Added => format!("Registered {import_path}"),
                PatchOutcome::AlreadyPresent => format!("{import_path} already registered"),
            },
            |req| add_import_to_file(&join_all(&req.source_dir, &ENTRY_POINT), &import_path),
        )?;

        Ok(())
    }

    /// Build geth and copy the binary into the output directory.
    pub fn run_build(&mut self) -> Result<PathBuf> {
        self.prepare_source()?;

        self.stage(
            "Building geth",
            |_: &crate::builder::Captured| "Built geth".to_string(),
            |req| BuildTool::new(req).install(Some(GETH_PACKAGE)),
        )?;

        let binary = format!("geth{}", std::env::consts::EXE_SUFFIX);
        let built = self.request.source_dir.join("build").join("bin").join(&binary);
        let dest = self.request.output_dir.join(&binary);
        create_output_dir(&self.request.output_dir)?;
        copy_file(&built, &dest)?;
        tracing::info!(path = %dest.display(), "copied binary");
        Ok(dest)
    }

    /// Build all tools, archive geth and copy the archives into the output directory.
    pub fn run_archive(&mut self) -> Result<Vec<PathBuf>> {
        self.prepare_source()?;

        let archives = self.stage(
            "Building and archiving geth",
            |names: &Vec<String>| format!("Created {} archive(s)", names.len()),
            |req| BuildTool::new(req).archive(GETH_PACKAGE),
        )?;

        create_output_dir(&self.request.output_dir)?;
        let mut copied = Vec::with_capacity(archives.len());
        for name in &archives {
            let dest = self.request.output_dir.join(name);
            copy_file(&self.request.source_dir.join(name), &dest)?;
            tracing::info!(path = %dest.display(), "copied archive");
            copied.push(dest);
        }
        Ok(copied)
    }
}

fn create_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| error::fs::write_failed(dir.display().to_string(), e.to_string()))
}
