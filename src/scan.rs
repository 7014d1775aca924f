//! Discovery of the modules a Terraform configuration uses
//!
//! A light line-based scan, not an HCL parser: every `module "<name>"` label
//! and every `source = "<value>"` assignment found in `.tf` files is
//! collected in file order, and the two lists are paired up positionally.
//! Files whose path below the scan root contains `modules` are skipped, so
//! vendored module code does not count as usage.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, TerrafileError};
use crate::sync::UsedModules;

const EXCLUDED_PATH_PART: &str = "modules";

static MODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"module\s*"([^"]*)""#)
        .unwrap_or_else(|e| unreachable!("module pattern is valid: {e}"))
});

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"source\s*=\s*"([^"]*)""#)
        .unwrap_or_else(|e| unreachable!("source pattern is valid: {e}"))
});

/// Scan `root` for module usages
pub fn find_used_modules(root: &Path) -> Result<UsedModules> {
    let mut names = Vec::new();
    let mut sources = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| TerrafileError::IoError {
            message: format!("failed to scan {}: {e}", root.display()),
        })?;
        if !entry.file_type().is_file() || !is_scanned(root, entry.path()) {
            continue;
        }

        let content = fs::read_to_string(entry.path()).map_err(|e| TerrafileError::IoError {
            message: format!("failed to read {}: {e}", entry.path().display()),
        })?;
        collect(&content, &mut names, &mut sources);
    }

    let used: BTreeMap<String, String> = names.into_iter().zip(sources).collect();
    debug!(root = %root.display(), modules = used.len(), "scanned module usages");
    Ok(UsedModules::new(root, used))
}

fn is_scanned(root: &Path, path: &Path) -> bool {
    let is_tf = path.extension().is_some_and(|ext| ext == "tf");
    let relative = path.strip_prefix(root).unwrap_or(path);
    is_tf && !relative.to_string_lossy().contains(EXCLUDED_PATH_PART)
}

fn collect(content: &str, names: &mut Vec<String>, sources: &mut Vec<String>) {
    for line in content.lines() {
        if let Some(captures) = MODULE_RE.captures(line) {
            names.push(captures[1].to_string());
        }
        if let Some(captures) = SOURCE_RE.captures(line) {
            sources.push(captures[1].to_string());
        }
    }
}
