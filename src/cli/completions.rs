use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    terrafile completions bash > ~/.bash_completion.d/terrafile\n\n\
                  Generate zsh completions:\n    terrafile completions zsh > ~/.zfunc/_terrafile\n\n\
                  Generate fish completions:\n    terrafile completions fish > ~/.config/fish/completions/terrafile.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
