//! CLI definitions using clap derive API
//!
//! Running `terrafile` without a subcommand synchronizes the modules of a
//! Terrafile. Submodules hold each command's argument types:
//! - sync: synchronization arguments (the default command)
//! - completions: completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod sync;

pub use completions::CompletionsArgs;
pub use sync::SyncArgs;

/// Terrafile - Terraform module fetcher
///
/// Fetch the Terraform modules declared in a Terrafile into local directories.
#[derive(Parser, Debug)]
#[command(
    name = "terrafile",
    author,
    version,
    args_conflicts_with_subcommands = true,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Fetch and pin Terraform modules declared in a Terrafile",
    long_about = "Terrafile materializes the Terraform modules declared in a Terrafile: \
                  local directories are copied, git repositories and registry modules are \
                  cloned at the requested version. Checkouts already at the resolved tag \
                  are left alone.\n\n\
                  Target directories are removed and recreated. Do not run two syncs \
                  against the same Terrafile at once.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  terrafile                               \x1b[90m# Use ./Terrafile\x1b[0m\n   \
                  terrafile infra/                        \x1b[90m# Use infra/Terrafile\x1b[0m\n   \
                  terrafile --optimize-downloads          \x1b[90m# Fetch only modules used by .tf files\x1b[0m\n   \
                  terrafile completions zsh               \x1b[90m# Print zsh completions\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sync: SyncArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    #[command(hide = true)]
    Version,
}
