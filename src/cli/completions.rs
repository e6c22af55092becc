use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    geth-builder completions bash > ~/.bash_completion.d/geth-builder\n\n\
                  Generate zsh completions:\n    geth-builder completions zsh > ~/.zfunc/_geth-builder\n\n\
                  Generate fish completions:\n    geth-builder completions fish > ~/.config/fish/completions/geth-builder.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
