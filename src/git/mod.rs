//! Git operations for fetching modules
//!
//! This module handles:
//! - Listing remote tags, newest first (`git ls-remote`)
//! - Listing the tags that point at a checkout's HEAD (libgit2)
//! - Shallow single-branch clones of a specific ref (`git clone`)
//! - Embedding a credential token into HTTPS clone URLs
//!
//! Remote operations shell out to the git CLI so that the user's git
//! configuration (proxies, credential helpers, `insteadOf` rules) applies.

pub mod auth;
pub mod command;
pub mod tags;
pub mod url;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TerrafileError};
use command::{GitCommand, ensure_safe_argument};

/// Exit status of `git ls-remote --exit-code` when no refs matched
const LS_REMOTE_NO_MATCH: i32 = 2;

/// Source-control operations used by the sync engine
pub trait SourceControl {
    /// Tag refs (`refs/tags/<name>`) of a remote, highest version first
    fn list_remote_tags(&self, source: &str) -> Result<Vec<String>>;

    /// Names of the tags pointing at the commit checked out in `dir`
    fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>>;

    /// Shallow clone of `git_ref` from `url` into `target`
    ///
    /// `target` must not exist. A `HEAD` ref clones the remote default branch.
    fn clone_ref(&self, url: &str, git_ref: &str, target: &Path) -> Result<()>;
}

/// Source control through the git CLI and libgit2
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
}

impl Git {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, operation: &str) -> GitCommand {
        GitCommand::new(&self.program, operation)
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl SourceControl for Git {
    fn list_remote_tags(&self, source: &str) -> Result<Vec<String>> {
        ensure_safe_argument(source)?;

        let output = self
            .command("ls-remote")
            .args([
                "ls-remote",
                "--tags",
                "--sort=-v:refname",
                "--exit-code",
                "--refs",
                source,
            ])
            .run()?;

        if output.status == Some(LS_REMOTE_NO_MATCH) {
            debug!(%source, "remote has no tags");
            return Ok(Vec::new());
        }
        output.clone().ensure_success()?;

        Ok(parse_ls_remote(&output.stdout))
    }

    fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>> {
        tags::tags_pointing_at_head(dir)
    }

    fn clone_ref(&self, url: &str, git_ref: &str, target: &Path) -> Result<()> {
        ensure_safe_argument(url)?;
        ensure_safe_argument(git_ref)?;

        let target_arg = target.to_str().ok_or_else(|| TerrafileError::IoError {
            message: format!("target path is not valid UTF-8: {}", target.display()),
        })?;

        let mut command = self
            .command("clone")
            .args(["-c", "advice.detachedHead=false", "clone", "--depth=1", "--single-branch"]);
        if !crate::version::is_head(git_ref) {
            command = command.arg(format!("--branch={git_ref}"));
        }

        command.args(["--", url, target_arg]).run()?.ensure_success()
    }
}

/// Extract ref names from `git ls-remote` output, keeping their order
fn parse_ls_remote(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter(|name| name.starts_with("refs/"))
        .map(str::to_string)
        .collect()
}
