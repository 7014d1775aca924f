//! Module source classification
//!
//! A Terrafile `source` is one of:
//! - a local directory: `./modules/vpc`, `../shared/vpc`, `/opt/modules/vpc`
//! - a registry coordinate: `terraform-aws-modules/vpc/aws`, optionally `//submodule`
//! - anything else, treated as a git URL: `https://github.com/owner/repo.git`
//!
//! Classification is pure pattern matching and never fails.

use std::sync::LazyLock;

use regex::Regex;

const NAME_PATTERN: &str = "[0-9A-Za-z](?:[0-9A-Za-z_-]{0,62}[0-9A-Za-z])?";
const PROVIDER_PATTERN: &str = "[0-9a-z]{1,64}";

static REGISTRY_SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^({NAME_PATTERN})/({NAME_PATTERN})/({PROVIDER_PATTERN})(?://(.*))?$"
    ))
    .unwrap_or_else(|e| unreachable!("registry source pattern is valid: {e}"))
});

/// Three-part registry module identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCoordinate {
    pub namespace: String,
    pub name: String,
    pub provider: String,

    /// Path after `//`, if any
    pub submodule: Option<String>,
}

impl RegistryCoordinate {
    /// Parse a registry coordinate, returning None for anything else
    pub fn parse(source: &str) -> Option<Self> {
        let captures = REGISTRY_SOURCE_RE.captures(source)?;
        Some(Self {
            namespace: captures[1].to_string(),
            name: captures[2].to_string(),
            provider: captures[3].to_string(),
            submodule: captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

impl std::fmt::Display for RegistryCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.name, self.provider)?;
        if let Some(submodule) = &self.submodule {
            write!(f, "//{submodule}")?;
        }
        Ok(())
    }
}

/// Classified manifest source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// Directory on the local filesystem, as written in the manifest
    Local(String),

    /// Module registry coordinate
    Registry(RegistryCoordinate),

    /// Git repository URL
    Remote(String),
}

impl ModuleSource {
    /// Classify a manifest `source` string
    pub fn classify(source: &str) -> Self {
        if is_local_path(source) {
            return ModuleSource::Local(source.to_string());
        }

        if let Some(coordinate) = RegistryCoordinate::parse(source) {
            return ModuleSource::Registry(coordinate);
        }

        ModuleSource::Remote(source.to_string())
    }
}

fn is_local_path(source: &str) -> bool {
    source.starts_with("./") || source.starts_with("../") || source.starts_with('/')
}
