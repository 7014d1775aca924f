//! Freshness check
//!
//! Only tags count: a target is fresh when the resolved version names a tag
//! pointing at the target's checked-out commit. Branches and `HEAD` are never
//! fresh, since they may have moved.

use std::path::Path;

use tracing::debug;

use crate::common::fs::Filesystem;
use crate::git::SourceControl;

/// Whether `target` is already checked out at `version`
pub fn is_fresh(git: &dyn SourceControl, fs: &dyn Filesystem, target: &Path, version: &str) -> bool {
    if !fs.is_dir(target) {
        return false;
    }

    match git.tags_at_head(target) {
        Ok(tags) => tags.iter().any(|tag| tag == version),
        Err(e) => {
            debug!(target = %target.display(), error = %e, "could not read tags at HEAD");
            false
        }
    }
}
