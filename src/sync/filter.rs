//! Optimize-mode entry selection
//!
//! In optimize mode only the manifest entries that the scanned Terraform
//! configuration actually references are fetched, and entries that would
//! produce the identical fetch are collapsed to one.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::ManifestEntry;

/// Modules referenced by scanned configuration: name to `source` string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedModules {
    root: PathBuf,
    sources: BTreeMap<String, String>,
}

impl UsedModules {
    /// `root` is the directory the scan started from
    pub fn new(root: impl Into<PathBuf>, sources: BTreeMap<String, String>) -> Self {
        Self {
            root: root.into(),
            sources,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_of(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Entries whose name is referenced by `used`
pub fn select_used(
    entries: &BTreeMap<String, ManifestEntry>,
    used: &UsedModules,
) -> BTreeMap<String, ManifestEntry> {
    entries
        .iter()
        .filter(|(name, _)| used.contains(name))
        .map(|(name, entry)| (name.clone(), entry.clone()))
        .collect()
}

/// Keep one entry per (source, version, module_path)
///
/// The first name in sort order represents each group.
pub fn remove_duplicates(
    entries: BTreeMap<String, ManifestEntry>,
) -> BTreeMap<String, ManifestEntry> {
    let mut seen = BTreeSet::new();
    entries
        .into_iter()
        .filter(|(_, entry)| {
            seen.insert((
                entry.source.clone(),
                entry.version.clone(),
                entry.module_path.clone(),
            ))
        })
        .collect()
}
