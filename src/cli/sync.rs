use clap::Parser;
use std::path::PathBuf;

use crate::registry::DEFAULT_REGISTRY_URL;
use crate::version::DEFAULT_VERSION_PREFIX;

/// Arguments for synchronizing a Terrafile
#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Terrafile, or a directory containing one (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Terrafile, or a directory containing one; overrides PATH
    #[arg(long, value_name = "PATH", env = "TERRAFILE_PATH")]
    pub terrafile: Option<PathBuf>,

    /// Only fetch modules referenced by .tf files under --scan-dir
    #[arg(long, env = "TERRAFILE_OPTIMIZE_DOWNLOADS")]
    pub optimize_downloads: bool,

    /// Directory scanned for .tf files (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub scan_dir: Option<PathBuf>,

    /// Characters allowed before the numeric part of a wildcard version, as a regex class body
    #[arg(
        long,
        value_name = "CLASS",
        default_value = DEFAULT_VERSION_PREFIX,
        env = "TERRAFILE_VERSION_PREFIX"
    )]
    pub version_prefix: String,

    /// Module registry base URL
    #[arg(
        long,
        value_name = "URL",
        default_value = DEFAULT_REGISTRY_URL,
        env = "TERRAFILE_REGISTRY_URL"
    )]
    pub registry_url: String,

    /// git executable
    #[arg(long, value_name = "PATH", default_value = "git", env = "TERRAFILE_GIT")]
    pub git: PathBuf,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
