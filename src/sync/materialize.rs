//! Materialization: make a target directory hold a module
//!
//! Both modes are destructive. The existing target tree is removed and
//! rebuilt from scratch, never updated in place.

use std::path::Path;

use tracing::debug;

use crate::common::fs::Filesystem;
use crate::env::Environment;
use crate::error::{Result, TerrafileError};
use crate::git::SourceControl;
use crate::git::auth::{add_token, redact};

/// Replace `target` with a copy of the local directory `source`
///
/// A missing source fails before anything is removed.
pub fn copy_local(fs: &dyn Filesystem, source: &Path, target: &Path) -> Result<()> {
    if !fs.is_dir(source) {
        return Err(TerrafileError::LocalSourceNotFound {
            path: source.display().to_string(),
        });
    }

    debug!(from = %source.display(), to = %target.display(), "copying local module");
    fs.remove_dir_all(target)?;
    fs.copy_dir(source, target)
}

/// Replace `target` with a shallow clone of `url` at `version`
///
/// When the environment provides a token it is embedded into matching HTTPS
/// URLs, and scrubbed from any error output.
pub fn clone_remote(
    git: &dyn SourceControl,
    fs: &dyn Filesystem,
    env: &dyn Environment,
    url: &str,
    version: &str,
    target: &Path,
) -> Result<()> {
    debug!(%url, %version, target = %target.display(), "cloning module");
    fs.remove_dir_all(target)?;

    match env.token() {
        Some(token) => git
            .clone_ref(&add_token(url, &token), version, target)
            .map_err(|e| redact_error(e, &token)),
        None => git.clone_ref(url, version, target),
    }
}

fn redact_error(err: TerrafileError, token: &str) -> TerrafileError {
    match err {
        TerrafileError::GitCommandFailed {
            operation,
            status,
            output,
        } => TerrafileError::GitCommandFailed {
            operation,
            status,
            output: redact(&output, token),
        },
        TerrafileError::UnsafeArgument { value, reason } => TerrafileError::UnsafeArgument {
            value: redact(&value, token),
            reason,
        },
        other => other,
    }
}
