//! Sync command: bring module directories in line with a Terrafile

use tracing::{info, warn};

use crate::common::fs::LocalFilesystem;
use crate::config::{Manifest, Settings};
use crate::env::ProcessEnvironment;
use crate::error::Result;
use crate::git::Git;
use crate::registry::HttpRegistry;
use crate::scan::find_used_modules;
use crate::sync::Synchronizer;
use crate::ui::ConsoleReporter;

/// Run a sync with production collaborators
pub fn run(settings: &Settings) -> Result<()> {
    let manifest = Manifest::load(&settings.terrafile)?;
    info!(
        terrafile = %manifest.path().display(),
        entries = manifest.entries().len(),
        "loaded Terrafile"
    );

    let used = if settings.optimize_downloads {
        let used = find_used_modules(&settings.scan_dir)?;
        if used.is_empty() {
            warn!(
                scan_dir = %settings.scan_dir.display(),
                "no module blocks found, nothing will be fetched"
            );
        }
        Some(used)
    } else {
        None
    };

    let git = Git::new(&settings.git_program);
    let registry = HttpRegistry::new(&settings.registry_url);
    let reporter = ConsoleReporter::new(manifest.dir_name());

    let synchronizer = Synchronizer {
        git: &git,
        registry: &registry,
        fs: &LocalFilesystem,
        env: &ProcessEnvironment,
        reporter: &reporter,
        version_prefix: &settings.version_prefix,
    };

    let report = synchronizer.sync(&manifest, used.as_ref())?;
    reporter.print_summary(&report);

    Ok(())
}
