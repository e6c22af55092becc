use clap::Parser;

use super::BuildArgs;
use crate::config::ArchiveKind;

/// Arguments for archive command
#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Archive format
    #[arg(long = "type", value_enum, default_value_t = ArchiveKind::Tar)]
    pub kind: ArchiveKind,
}
