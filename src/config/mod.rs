//! Configuration for a terrafile run
//!
//! This module contains:
//! - `Terrafile` manifest loading ([`manifest`])
//! - [`Settings`], the resolved run configuration built from CLI flags and
//!   environment variables

pub mod manifest;

use std::path::{Path, PathBuf};

use crate::cli::SyncArgs;
use crate::error::Result;
use crate::version::VersionPrefix;

pub use manifest::{Manifest, ManifestEntry};

/// Resolved configuration for one sync run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Terrafile path or the directory containing it
    pub terrafile: PathBuf,

    /// Restrict fetching to modules referenced by `.tf` files
    pub optimize_downloads: bool,

    /// Root of the `.tf` scan in optimize mode
    pub scan_dir: PathBuf,

    pub version_prefix: VersionPrefix,

    /// Registry modules base URL
    pub registry_url: String,

    /// git executable
    pub git_program: PathBuf,
}

impl Settings {
    /// Build settings from parsed arguments, resolving relative paths against `cwd`
    pub fn from_args(args: &SyncArgs, cwd: &Path) -> Result<Self> {
        let terrafile = args
            .terrafile
            .clone()
            .or_else(|| args.path.clone())
            .map_or_else(|| cwd.to_path_buf(), |p| absolutize(cwd, &p));

        let scan_dir = args
            .scan_dir
            .as_deref()
            .map_or_else(|| cwd.to_path_buf(), |p| absolutize(cwd, p));

        Ok(Self {
            terrafile,
            optimize_downloads: args.optimize_downloads,
            scan_dir,
            version_prefix: VersionPrefix::new(args.version_prefix.clone())?,
            registry_url: args.registry_url.clone(),
            git_program: args.git.clone(),
        })
    }
}

/// Join `path` onto `base` unless it is already absolute
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
