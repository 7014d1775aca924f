//! Common test utilities for terrafile integration tests

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tempfile::TempDir;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write the Terrafile at the workspace root
    pub fn write_terrafile(&self, content: &str) {
        self.write_file("Terrafile", content);
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create a git repository under `repos/<name>` with an initial commit
    pub fn create_git_repo(&self, name: &str) -> PathBuf {
        let repo_path = self.path.join("repos").join(name);
        std::fs::create_dir_all(&repo_path).expect("Failed to create repo directory");

        git(&repo_path, &["init", "--quiet", "--initial-branch=main"]);
        std::fs::write(repo_path.join("main.tf"), "# initial\n").expect("Failed to write main.tf");
        git(&repo_path, &["add", "."]);
        git(&repo_path, &["commit", "--quiet", "-m", "initial"]);

        repo_path
    }

    /// Commit `main.tf` with `content` and tag the commit
    pub fn commit_and_tag(&self, repo_path: &Path, content: &str, tag: &str) {
        std::fs::write(repo_path.join("main.tf"), content).expect("Failed to write main.tf");
        git(repo_path, &["add", "."]);
        git(repo_path, &["commit", "--quiet", "-m", tag]);
        git(repo_path, &["tag", tag]);
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// `file://` URL for a local repository
#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.to_str().expect("Path is not valid UTF-8"))
}

/// Run git in `dir` with a fixed identity and signing disabled
fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args([
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}
