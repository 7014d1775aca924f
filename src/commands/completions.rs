//! Shell completions command

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Generate shell completions
pub fn run(args: &CompletionsArgs) -> Result<()> {
    write_completions(args, &mut std::io::stdout().lock());
    Ok(())
}

fn write_completions(args: &CompletionsArgs, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "terrafile", out);
}
