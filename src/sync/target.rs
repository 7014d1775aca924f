//! Target directory computation

use std::path::{Path, PathBuf};

use crate::config::{ManifestEntry, absolutize};
use crate::error::{Result, TerrafileError};
use crate::git::url::repo_name_from_url;

use super::UsedModules;

/// Directory an entry is materialized into
///
/// An explicit `module_path` always wins and is resolved against the manifest
/// directory. Otherwise the target is `<manifest dir>/<name>`, unless `used`
/// holds a scanned `source` for the entry: then the scanned source is cut
/// after the last occurrence of the repository name and resolved against the
/// scan root.
pub fn resolve_target(
    name: &str,
    entry: &ManifestEntry,
    manifest_dir: &Path,
    used: Option<&UsedModules>,
) -> Result<PathBuf> {
    if let Some(module_path) = &entry.module_path {
        return Ok(absolutize(manifest_dir, Path::new(module_path)));
    }

    let Some((root, used_source)) = used.and_then(|u| u.source_of(name).map(|s| (u.root(), s)))
    else {
        return Ok(manifest_dir.join(name));
    };

    let repo_name = repo_name_from_url(&entry.source)?;
    let derived = truncate_at_repo_name(used_source, &repo_name).ok_or_else(|| {
        TerrafileError::TargetDerivationFailed {
            name: name.to_string(),
            source_path: used_source.to_string(),
        }
    })?;

    Ok(absolutize(root, Path::new(derived)))
}

/// `used_source` up to and including the last occurrence of `repo_name`
fn truncate_at_repo_name<'a>(used_source: &'a str, repo_name: &str) -> Option<&'a str> {
    used_source
        .rfind(repo_name)
        .map(|index| &used_source[..index + repo_name.len()])
}
