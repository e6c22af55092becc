use clap::Parser;

/// Arguments for init command
#[derive(Parser, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short = 'f')]
    pub force: bool,
}
