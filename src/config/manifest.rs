//! Terrafile manifest loading
//!
//! A Terrafile is a YAML mapping from module name to its source:
//!
//! ```yaml
//! vpc:
//!   source: terraform-aws-modules/vpc/aws
//!   version: 2.+
//! network:
//!   source: https://github.com/acme/terraform-network.git
//!   version: v1.4.0
//!   module_path: vendor/network
//! shared:
//!   source: ../shared/modules/tags
//!   version: local
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, TerrafileError};

/// File name looked up when the manifest path is a directory
pub const MANIFEST_FILE_NAME: &str = "Terrafile";

/// One module declaration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// Local path, registry coordinate, or git URL
    pub source: String,

    /// Exact tag, branch, `HEAD`, or wildcard expression
    #[serde(deserialize_with = "deserialize_version")]
    pub version: String,

    /// Explicit target directory
    #[serde(default, alias = "modulePath")]
    pub module_path: Option<String>,
}

#[cfg(test)]
impl ManifestEntry {
    pub fn new(source: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            version: version.into(),
            module_path: None,
        }
    }

    #[must_use]
    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = Some(module_path.into());
        self
    }
}

/// Accept YAML numbers as versions (`version: 1.2` reads as "1.2")
fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(version) => Ok(version),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "version must be a string, found {other:?}"
        ))),
    }
}

/// A loaded Terrafile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    path: PathBuf,
    dir: PathBuf,
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from already-parsed entries
    pub fn new(path: impl Into<PathBuf>, entries: BTreeMap<String, ManifestEntry>) -> Self {
        let path = path.into();
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self { path, dir, entries }
    }

    /// Load the Terrafile at `path`, or `path/Terrafile` when `path` is a directory
    pub fn load(path: &Path) -> Result<Self> {
        let path = manifest_path(path);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TerrafileError::ManifestNotFound {
                path: path.display().to_string(),
            },
            _ => TerrafileError::ManifestReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;

        let path = dunce::canonicalize(&path).unwrap_or(path);
        let entries = parse_entries(&path, &content)?;
        Ok(Self::new(path, entries))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the Terrafile; local sources and default targets are relative to it
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base name of the manifest directory, used in progress messages
    pub fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map_or_else(|| self.dir.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Entries in name order
    pub fn entries(&self) -> &BTreeMap<String, ManifestEntry> {
        &self.entries
    }
}

/// Resolve a manifest location to the Terrafile path
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

fn parse_entries(path: &Path, content: &str) -> Result<BTreeMap<String, ManifestEntry>> {
    let parse_failed = |e: serde_yaml::Error| TerrafileError::ManifestParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_failed)?;
    if value.is_null() {
        return Err(TerrafileError::ManifestEmpty {
            path: path.display().to_string(),
        });
    }

    let entries: BTreeMap<String, ManifestEntry> =
        serde_yaml::from_value(value).map_err(parse_failed)?;
    if entries.is_empty() {
        return Err(TerrafileError::ManifestEmpty {
            path: path.display().to_string(),
        });
    }

    Ok(entries)
}
