//! Configuration file (geth-builder.yaml) data structures

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

pub const DEFAULT_CONFIG_FILE: &str = "geth-builder.yaml";
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/ethereum/go-ethereum";
pub const DEFAULT_BRANCH: &str = "master";

/// Written by `geth-builder init`
pub const DEFAULT_CONFIG_YAML: &str = "\
# Upstream go-ethereum repository and branch to build from
repository_url: https://github.com/ethereum/go-ethereum
branch: master

# Directory of the plugin package to inject, relative to this file.
# It is copied to eth/tracers/native/<directory name>.
plugin_path: ./tracer

# Extra flags for the Go toolchain, exported as GOFLAGS
build_flags: \"\"

# Where built binaries and archives are copied
output_dir: ./build

# Where go-ethereum is checked out; an existing directory is reused as is
source_dir: ./go-ethereum

# Go toolchain binary
go_binary: go

# Abort a build step after this many seconds
# build_timeout_secs: 3600
";

fn default_repository_url() -> String {
    DEFAULT_REPOSITORY_URL.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./build")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./go-ethereum")
}

fn default_go_binary() -> String {
    "go".to_string()
}

/// Builder configuration (geth-builder.yaml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// Upstream repository URL
    #[serde(default = "default_repository_url", alias = "geth_repo")]
    pub repository_url: String,

    #[serde(default = "default_branch", alias = "geth_branch")]
    pub branch: String,

    /// Plugin package directory
    #[serde(default, alias = "path", skip_serializing_if = "Option::is_none")]
    pub plugin_path: Option<PathBuf>,

    /// Exported to the build tool as `GOFLAGS`
    #[serde(default)]
    pub build_flags: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Checkout location of the upstream source
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_go_binary")]
    pub go_binary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_timeout_secs: Option<u64>,

    /// Absolute directory of the file this was loaded from
    #[serde(skip)]
    config_dir: PathBuf,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            branch: default_branch(),
            plugin_path: None,
            build_flags: String::new(),
            output_dir: default_output_dir(),
            source_dir: default_source_dir(),
            go_binary: default_go_binary(),
            build_timeout_secs: None,
            config_dir: PathBuf::new(),
        }
    }
}

impl BuilderConfig {
    /// Load the configuration at `path`. Relative paths inside it resolve
    /// against the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        if !path.is_file() {
            return Err(error::config::not_found(display));
        }

        let yaml = fs::read_to_string(path)
            .map_err(|e| error::config::read_failed(&display, e.to_string()))?;
        let mut config = Self::from_yaml(&yaml)
            .map_err(|e| error::config::parse_failed(&display, e.to_string()))?;

        let absolute = absolute_path(path)?;
        config.config_dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.validate()?;
        tracing::debug!(path = %absolute.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a YAML string. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    fn validate(&self) -> Result<()> {
        if self.repository_url.trim().is_empty() {
            return Err(error::config::invalid("repository_url must not be empty"));
        }
        if self.branch.trim().is_empty() {
            return Err(error::config::invalid("branch must not be empty"));
        }
        if self.go_binary.trim().is_empty() {
            return Err(error::config::invalid("go_binary must not be empty"));
        }
        if self.build_timeout_secs == Some(0) {
            return Err(error::config::invalid(
                "build_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Resolve `path` against the configuration directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        clean(&self.config_dir.join(path))
    }

    /// Absolute plugin package directory; `None` when the file names none.
    pub fn absolute_plugin_path(&self) -> Option<PathBuf> {
        self.plugin_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| self.resolve(p))
    }

    pub fn absolute_output_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn absolute_source_dir(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }
}

/// Write the default configuration to `path`, refusing to replace an
/// existing file (or dangling symlink) unless `force` is set.
pub fn write_default(path: &Path, force: bool) -> Result<()> {
    let shown = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| error::fs::write_failed(&shown, e.to_string()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => error::config::already_exists(&shown),
        _ => error::fs::write_failed(&shown, e.to_string()),
    })?;
    file.write_all(DEFAULT_CONFIG_YAML.as_bytes())
        .map_err(|e| error::fs::write_failed(&shown, e.to_string()))
}

/// `path` made absolute against the working directory, without touching symlinks
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| {
        error::fs::io_error(format!("Failed to resolve {}: {e}", path.display()))
    })?;
    Ok(clean(&absolute))
}

/// Lexically remove `.` and `..` components.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
