//! Terrafile - Terraform module fetcher
//!
//! Materializes the Terraform modules declared in a Terrafile: local module
//! directories are copied, git repositories and registry modules are cloned
//! at a pinned or wildcard-resolved version.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod common;
mod config;
mod env;
mod error;
mod git;
mod registry;
mod scan;
mod source;
mod sync;
mod ui;
mod version;

use cli::{Cli, Commands};
use config::Settings;
use error::Result;

fn init_tracing(verbose: bool) {
    let default = if verbose { "terrafile=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions(args)) => commands::completions::run(&args),
        Some(Commands::Version) => commands::version::run(),
        None => {
            let cwd = std::env::current_dir()?;
            let settings = Settings::from_args(&cli.sync, &cwd)?;
            commands::sync::run(&settings)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.sync.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        if let Some(help) = miette::Diagnostic::help(e.innermost()) {
            eprintln!("Help: {help}");
        }
        std::process::exit(e.exit_code());
    }
}
