use clap::Parser;
use std::path::PathBuf;

use crate::config::Overrides;

/// Values that override the configuration file for one run
#[derive(Parser, Debug, Default, Clone)]
pub struct BuildArgs {
    /// go-ethereum repository URL
    #[arg(long = "geth.repo", value_name = "URL")]
    pub repository_url: Option<String>,

    /// go-ethereum branch to clone
    #[arg(long = "geth.branch", value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Plugin package directory
    #[arg(long = "path", value_name = "DIR")]
    pub plugin_path: Option<PathBuf>,

    /// Output directory for the built binary or archives
    #[arg(long = "output", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Target architecture passed to the build tool
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Abort a build step after this many seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,
}

impl From<&BuildArgs> for Overrides {
    fn from(args: &BuildArgs) -> Self {
        Self {
            repository_url: args.repository_url.clone(),
            branch: args.branch.clone(),
            plugin_path: args.plugin_path.clone(),
            output_dir: args.output_dir.clone(),
            arch: args.arch.clone(),
            timeout_secs: args.timeout_secs,
        }
    }
}
