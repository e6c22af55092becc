//! The immutable description of one build run

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use super::file::{BuilderConfig, absolute_path};
use crate::error::{self, Result};

/// Archive format requested from the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ArchiveKind {
    /// Plain build, no archive step
    #[default]
    #[value(skip)]
    None,
    Zip,
    Tar,
}

impl ArchiveKind {
    /// Value passed to `ci.go archive --type`
    pub fn as_arg(self) -> Option<&'static str> {
        match self {
            ArchiveKind::None => None,
            ArchiveKind::Zip => Some("zip"),
            ArchiveKind::Tar => Some("tar"),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg().unwrap_or("none"))
    }
}

/// Command-line values that take precedence over the configuration file.
/// Relative paths here resolve against the working directory.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repository_url: Option<String>,
    pub branch: Option<String>,
    pub plugin_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub arch: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Everything one pipeline run needs, fixed before the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub repository_url: String,
    pub branch: String,
    /// Absolute plugin package directory
    pub plugin_dir: PathBuf,
    pub output_dir: PathBuf,
    pub source_dir: PathBuf,
    /// Target architecture passed as `--arch`
    pub arch: Option<String>,
    pub verbose: bool,
    pub archive: ArchiveKind,
    pub build_flags: String,
    pub go_binary: String,
    pub timeout: Option<Duration>,
}

impl BuildRequest {
    /// Combine the configuration file with command-line overrides.
    pub fn new(
        config: &BuilderConfig,
        overrides: &Overrides,
        archive: ArchiveKind,
        verbose: bool,
    ) -> Result<Self> {
        let plugin_dir = match &overrides.plugin_path {
            Some(path) => absolute_path(path)?,
            None => config.absolute_plugin_path().ok_or_else(|| {
                error::config::invalid(
                    "no plugin directory configured; set plugin_path or pass --path",
                )
            })?,
        };
        if plugin_dir.file_name().is_none() {
            return Err(error::config::invalid(format!(
                "plugin directory {} has no name to import it by",
                plugin_dir.display()
            )));
        }

        let output_dir = match &overrides.output_dir {
            Some(path) => absolute_path(path)?,
            None => config.absolute_output_dir(),
        };

        let timeout_secs = overrides.timeout_secs.or(config.build_timeout_secs);
        if timeout_secs == Some(0) {
            return Err(error::config::invalid("timeout must be greater than zero"));
        }

        Ok(Self {
            repository_url: overrides
                .repository_url
                .clone()
                .unwrap_or_else(|| config.repository_url.clone()),
            branch: overrides
                .branch
                .clone()
                .unwrap_or_else(|| config.branch.clone()),
            plugin_dir,
            output_dir,
            source_dir: config.absolute_source_dir(),
            arch: overrides.arch.clone(),
            verbose,
            archive,
            build_flags: config.build_flags.clone(),
            go_binary: config.go_binary.clone(),
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }

    /// Directory name of the plugin, which is also its Go package path element
    pub fn plugin_name(&self) -> String {
        self.plugin_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
