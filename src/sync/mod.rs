//! Synchronization engine
//!
//! Brings every module directory named in a Terrafile in line with its
//! declared source and version. Entries are processed one at a time in name
//! order:
//!
//! 1. compute the target directory ([`target`])
//! 2. classify the source
//! 3. local sources are copied and the entry is done
//! 4. remote and registry sources get their version resolved against the
//!    remote's tags; registry sources are then looked up in the registry
//! 5. a target already checked out at the resolved tag is left alone
//!    ([`freshness`])
//! 6. anything else is removed and cloned again ([`materialize`])
//!
//! The first failing entry aborts the run. Entries processed before it keep
//! their new contents.
//!
//! Materialization removes and recreates target directories without locking,
//! so a run must be the only writer of its targets. Two concurrent runs
//! against the same manifest directory are not supported.

pub mod filter;
pub mod freshness;
pub mod materialize;
pub mod target;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::common::fs::Filesystem;
use crate::config::{Manifest, ManifestEntry};
use crate::env::Environment;
use crate::error::Result;
use crate::git::SourceControl;
use crate::registry::{self, RegistryClient};
use crate::source::ModuleSource;
use crate::ui::{Reporter, SyncEvent};
use crate::version::{VersionPrefix, resolve_version};

pub use filter::UsedModules;

/// How an entry ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Local source copied into the target
    Copied { target: PathBuf },

    /// Target cloned from `url` at `version`
    Cloned {
        target: PathBuf,
        url: String,
        version: String,
    },

    /// Target already checked out at `version`
    UpToDate { target: PathBuf, version: String },
}

/// Per-entry outcomes of a completed run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    outcomes: Vec<(String, Outcome)>,
}

impl SyncReport {
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes.iter().map(|(name, outcome)| (name.as_str(), outcome))
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// The engine and the collaborators it drives
pub struct Synchronizer<'a> {
    pub git: &'a dyn SourceControl,
    pub registry: &'a dyn RegistryClient,
    pub fs: &'a dyn Filesystem,
    pub env: &'a dyn Environment,
    pub reporter: &'a dyn Reporter,
    pub version_prefix: &'a VersionPrefix,
}

impl Synchronizer<'_> {
    /// Synchronize every entry of `manifest`
    ///
    /// With `used` (optimize mode) only entries referenced by the scanned
    /// configuration are processed, duplicates are collapsed, and targets are
    /// derived from the referencing `source` strings.
    pub fn sync(&self, manifest: &Manifest, used: Option<&UsedModules>) -> Result<SyncReport> {
        let entries = match used {
            Some(used) => {
                let selected = filter::remove_duplicates(filter::select_used(
                    manifest.entries(),
                    used,
                ));
                info!(
                    selected = selected.len(),
                    declared = manifest.entries().len(),
                    "optimize mode: filtered entries"
                );
                selected
            }
            None => manifest.entries().clone(),
        };

        self.sync_entries(manifest, &entries, used)
    }

    fn sync_entries(
        &self,
        manifest: &Manifest,
        entries: &BTreeMap<String, ManifestEntry>,
        used: Option<&UsedModules>,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for (name, entry) in entries {
            let outcome = self
                .sync_entry(manifest, name, entry, used)
                .map_err(|e| e.in_module(name))?;
            report.outcomes.push((name.clone(), outcome));
        }

        Ok(report)
    }

    /// Resolve and materialize one entry
    pub fn sync_entry(
        &self,
        manifest: &Manifest,
        name: &str,
        entry: &ManifestEntry,
        used: Option<&UsedModules>,
    ) -> Result<Outcome> {
        let target = target::resolve_target(name, entry, manifest.dir(), used)?;
        debug!(module = name, target = %target.display(), "processing entry");

        let (url, version) = match ModuleSource::classify(&entry.source) {
            ModuleSource::Local(path) => {
                self.reporter.report(SyncEvent::Copying { name });
                let source = manifest.dir().join(path);
                materialize::copy_local(self.fs, &source, &target)?;
                return Ok(Outcome::Copied { target });
            }
            ModuleSource::Remote(url) => {
                let version = self.resolve_version(entry)?;
                (url, version)
            }
            ModuleSource::Registry(coordinate) => {
                let version = self.resolve_version(entry)?;
                self.reporter.report(SyncEvent::Checking { name });
                registry::resolve_from_registry(self.registry, &coordinate, &version)?
            }
        };

        if freshness::is_fresh(self.git, self.fs, &target, &version) {
            self.reporter.report(SyncEvent::UpToDate {
                name,
                version: &version,
            });
            return Ok(Outcome::UpToDate { target, version });
        }

        self.reporter.report(SyncEvent::Fetching {
            name,
            version: &version,
        });
        materialize::clone_remote(self.git, self.fs, self.env, &url, &version, &target)?;

        Ok(Outcome::Cloned {
            target,
            url,
            version,
        })
    }

    /// Tags are listed from the raw manifest source, for registry entries too
    fn resolve_version(&self, entry: &ManifestEntry) -> Result<String> {
        resolve_version(&entry.version, &entry.source, self.version_prefix, || {
            self.git.list_remote_tags(&entry.source)
        })
    }
}

impl std::fmt::Debug for Synchronizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("version_prefix", &self.version_prefix)
            .finish_non_exhaustive()
    }
}
