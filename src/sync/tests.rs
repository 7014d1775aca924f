use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::common::fs::LocalFilesystem;
use crate::env::testing::MapEnvironment;
use crate::error::TerrafileError;
use crate::registry::DownloadResponse;
use crate::source::RegistryCoordinate;

#[derive(Default)]
struct FakeGit {
    remote_tags: HashMap<String, Vec<String>>,
    head_tags: HashMap<PathBuf, Vec<String>>,
    listed: RefCell<Vec<String>>,
    clones: RefCell<Vec<(String, String, PathBuf)>>,
}

impl FakeGit {
    fn with_remote_tags(mut self, source: &str, tags: &[&str]) -> Self {
        self.remote_tags.insert(
            source.to_string(),
            tags.iter().map(|t| format!("refs/tags/{t}")).collect(),
        );
        self
    }

    fn with_head_tags(mut self, dir: &Path, tags: &[&str]) -> Self {
        self.head_tags.insert(
            dir.to_path_buf(),
            tags.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    fn clones(&self) -> Vec<(String, String, PathBuf)> {
        self.clones.borrow().clone()
    }
}

impl SourceControl for FakeGit {
    fn list_remote_tags(&self, source: &str) -> Result<Vec<String>> {
        self.listed.borrow_mut().push(source.to_string());
        Ok(self.remote_tags.get(source).cloned().unwrap_or_default())
    }

    fn tags_at_head(&self, dir: &Path) -> Result<Vec<String>> {
        self.head_tags
            .get(dir)
            .cloned()
            .ok_or_else(|| TerrafileError::GitOperationFailed {
                message: format!("not a repository: {}", dir.display()),
            })
    }

    fn clone_ref(&self, url: &str, git_ref: &str, target: &Path) -> Result<()> {
        fs::create_dir_all(target)?;
        self.clones
            .borrow_mut()
            .push((url.to_string(), git_ref.to_string(), target.to_path_buf()));
        Ok(())
    }
}

#[derive(Default)]
struct FakeRegistry {
    locations: HashMap<String, String>,
    requests: RefCell<Vec<(String, String)>>,
}

impl FakeRegistry {
    fn with_location(mut self, coordinate: &str, location: &str) -> Self {
        self.locations
            .insert(coordinate.to_string(), location.to_string());
        self
    }
}

impl RegistryClient for FakeRegistry {
    fn download(&self, coordinate: &RegistryCoordinate, version: &str) -> Result<DownloadResponse> {
        let key = coordinate.to_string();
        self.requests
            .borrow_mut()
            .push((key.clone(), version.to_string()));
        Ok(match self.locations.get(&key) {
            Some(location) => DownloadResponse {
                status: 204,
                location: Some(location.clone()),
                body: String::new(),
            },
            None => DownloadResponse {
                status: 404,
                location: None,
                body: r#"{"errors":["Not Found"]}"#.to_string(),
            },
        })
    }
}

#[derive(Default)]
struct RecordingReporter {
    lines: RefCell<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn report(&self, event: SyncEvent<'_>) {
        let line = match event {
            SyncEvent::Copying { name } => format!("copy {name}"),
            SyncEvent::Checking { name } => format!("check {name}"),
            SyncEvent::UpToDate { name, version } => format!("fresh {name} {version}"),
            SyncEvent::Fetching { name, version } => format!("fetch {name} {version}"),
        };
        self.lines.borrow_mut().push(line);
    }
}

struct Harness {
    git: FakeGit,
    registry: FakeRegistry,
    env: MapEnvironment,
    reporter: RecordingReporter,
    prefix: VersionPrefix,
}

impl Harness {
    fn new(git: FakeGit) -> Self {
        Self {
            git,
            registry: FakeRegistry::default(),
            env: MapEnvironment::default(),
            reporter: RecordingReporter::default(),
            prefix: VersionPrefix::default(),
        }
    }

    fn with_registry(mut self, registry: FakeRegistry) -> Self {
        self.registry = registry;
        self
    }

    fn run(&self, manifest: &Manifest, used: Option<&UsedModules>) -> Result<SyncReport> {
        let synchronizer = Synchronizer {
            git: &self.git,
            registry: &self.registry,
            fs: &LocalFilesystem,
            env: &self.env,
            reporter: &self.reporter,
            version_prefix: &self.prefix,
        };
        synchronizer.sync(manifest, used)
    }

    fn lines(&self) -> Vec<String> {
        self.reporter.lines.borrow().clone()
    }
}

fn manifest(dir: &Path, items: &[(&str, ManifestEntry)]) -> Manifest {
    let entries: BTreeMap<String, ManifestEntry> = items
        .iter()
        .map(|(name, entry)| ((*name).to_string(), entry.clone()))
        .collect();
    Manifest::new(dir.join("Terrafile"), entries)
}

const VPC_URL: &str = "https://github.com/acme/terraform-aws-vpc.git";

#[test]
fn test_registry_module_resolves_to_tagged_clone() {
    let temp = TempDir::new().unwrap();
    let git = FakeGit::default().with_remote_tags(
        "terraform-aws-modules/vpc/aws",
        &["3.0.0", "2.3.1", "2.3.0", "1.9.0"],
    );
    let harness = Harness::new(git).with_registry(FakeRegistry::default().with_location(
        "terraform-aws-modules/vpc/aws",
        "https://api.github.com/repos/aws-modules/terraform-aws-vpc/tarball/v2.3.1//*?archive=tar.gz",
    ));
    let manifest = manifest(
        temp.path(),
        &[("vpc", ManifestEntry::new("terraform-aws-modules/vpc/aws", "2.+"))],
    );

    let report = harness.run(&manifest, None).unwrap();

    let target = temp.path().join("vpc");
    assert_eq!(
        harness.git.clones(),
        vec![(
            "https://github.com/aws-modules/terraform-aws-vpc.git".to_string(),
            "v2.3.1".to_string(),
            target.clone()
        )]
    );
    assert_eq!(
        harness.registry.requests.borrow().as_slice(),
        &[("terraform-aws-modules/vpc/aws".to_string(), "2.3.1".to_string())]
    );
    assert_eq!(
        report.get("vpc"),
        Some(&Outcome::Cloned {
            target,
            url: "https://github.com/aws-modules/terraform-aws-vpc.git".to_string(),
            version: "v2.3.1".to_string(),
        })
    );
    assert_eq!(harness.lines(), vec!["check vpc", "fetch vpc v2.3.1"]);
}

#[test]
fn test_checkout_at_resolved_tag_is_skipped() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("vpc");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("main.tf"), "# checked out").unwrap();

    let git = FakeGit::default()
        .with_remote_tags(VPC_URL, &["v1.3.0", "v1.2.0"])
        .with_head_tags(&target, &["v1.3.0"]);
    let harness = Harness::new(git);
    let manifest = manifest(temp.path(), &[("vpc", ManifestEntry::new(VPC_URL, "v1.+"))]);

    let report = harness.run(&manifest, None).unwrap();

    assert!(harness.git.clones().is_empty());
    assert_eq!(
        report.get("vpc"),
        Some(&Outcome::UpToDate {
            target: target.clone(),
            version: "v1.3.0".to_string(),
        })
    );
    assert_eq!(
        fs::read_to_string(target.join("main.tf")).unwrap(),
        "# checked out"
    );
    assert_eq!(harness.lines(), vec!["fresh vpc v1.3.0"]);
}

#[test]
fn test_checkout_at_older_tag_is_refetched() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("vpc");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("old.tf"), "").unwrap();

    let git = FakeGit::default()
        .with_remote_tags(VPC_URL, &["v1.3.0", "v1.2.0"])
        .with_head_tags(&target, &["v1.2.0"]);
    let harness = Harness::new(git);
    let manifest = manifest(temp.path(), &[("vpc", ManifestEntry::new(VPC_URL, "v1.+"))]);

    harness.run(&manifest, None).unwrap();

    assert_eq!(harness.git.clones().len(), 1);
    assert_eq!(harness.git.clones()[0].1, "v1.3.0");
    assert!(!target.join("old.tf").exists());
}

#[test]
fn test_branch_versions_are_always_refetched() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("vpc");
    fs::create_dir_all(&target).unwrap();

    let git = FakeGit::default().with_head_tags(&target, &["v1.0.0"]);
    let harness = Harness::new(git);
    let manifest = manifest(temp.path(), &[("vpc", ManifestEntry::new(VPC_URL, "master"))]);

    harness.run(&manifest, None).unwrap();

    assert!(harness.git.listed.borrow().is_empty());
    assert_eq!(
        harness.git.clones(),
        vec![(VPC_URL.to_string(), "master".to_string(), target)]
    );
}

#[test]
fn test_local_source_replaces_target() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("shared/tags");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("main.tf"), "# tags").unwrap();
    let target = temp.path().join("tags");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("leftover.tf"), "").unwrap();

    let harness = Harness::new(FakeGit::default());
    let manifest = manifest(
        temp.path(),
        &[("tags", ManifestEntry::new("./shared/tags", "ignored"))],
    );

    let report = harness.run(&manifest, None).unwrap();

    assert_eq!(report.get("tags"), Some(&Outcome::Copied { target: target.clone() }));
    assert_eq!(fs::read_to_string(target.join("main.tf")).unwrap(), "# tags");
    assert!(!target.join("leftover.tf").exists());
    assert!(harness.git.listed.borrow().is_empty());
    assert_eq!(harness.lines(), vec!["copy tags"]);
}

#[test]
fn test_first_failure_aborts_run_without_rollback() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("shared")).unwrap();
    fs::write(temp.path().join("shared/main.tf"), "").unwrap();

    let git = FakeGit::default().with_remote_tags(VPC_URL, &["v1.0.0"]);
    let harness = Harness::new(git);
    let manifest = manifest(
        temp.path(),
        &[
            ("a-shared", ManifestEntry::new("./shared", "n/a")),
            ("b-vpc", ManifestEntry::new(VPC_URL, "v9.+")),
            ("c-shared", ManifestEntry::new("./shared", "n/a")),
        ],
    );

    let err = harness.run(&manifest, None).unwrap_err();

    match &err {
        TerrafileError::ModuleFailed { name, error } => {
            assert_eq!(name, "b-vpc");
            assert!(matches!(**error, TerrafileError::VersionNotFound { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(temp.path().join("a-shared/main.tf").exists());
    assert!(!temp.path().join("c-shared").exists());
    assert!(harness.git.clones().is_empty());
}

#[test]
fn test_registry_failure_names_the_module() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(FakeGit::default());
    let manifest = manifest(
        temp.path(),
        &[("dns", ManifestEntry::new("acme/dns/aws", "1.0.0"))],
    );

    let err = harness.run(&manifest, None).unwrap_err();

    assert!(err.to_string().contains("dns"));
    assert!(err.to_string().contains("404"));
    assert_eq!(err.exit_code(), crate::error::EXIT_EXTERNAL_FAILURE);
}

#[test]
fn test_malformed_wildcard_is_bad_input() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(FakeGit::default());
    let manifest = manifest(temp.path(), &[("vpc", ManifestEntry::new(VPC_URL, "latest+"))]);

    let err = harness.run(&manifest, None).unwrap_err();

    assert_eq!(err.exit_code(), crate::error::EXIT_BAD_INPUT);
    assert!(harness.git.listed.borrow().is_empty());
}

#[test]
fn test_optimize_filters_and_collapses_duplicates() {
    for names in [["alpha", "beta"], ["beta", "alpha"]] {
        let temp = TempDir::new().unwrap();
        let git = FakeGit::default().with_remote_tags(VPC_URL, &["v1.0.0"]);
        let harness = Harness::new(git);
        let manifest = manifest(
            temp.path(),
            &[
                (names[0], ManifestEntry::new(VPC_URL, "v1.0.0")),
                (names[1], ManifestEntry::new(VPC_URL, "v1.0.0")),
                ("unused", ManifestEntry::new(VPC_URL, "v1.0.0").with_module_path("x")),
            ],
        );
        let used = UsedModules::new(
            temp.path(),
            BTreeMap::from([
                ("alpha".to_string(), "./terraform-aws-vpc".to_string()),
                ("beta".to_string(), "./terraform-aws-vpc".to_string()),
            ]),
        );

        let report = harness.run(&manifest, Some(&used)).unwrap();

        assert_eq!(report.len(), 1);
        assert!(report.get("alpha").is_some());
        assert_eq!(harness.git.clones().len(), 1);
    }
}

#[test]
fn test_optimize_redirects_target_to_scanned_source() {
    let temp = TempDir::new().unwrap();
    let scan_root = temp.path().join("live/prod");
    let harness = Harness::new(FakeGit::default());
    let manifest = manifest(
        temp.path(),
        &[("vpc", ManifestEntry::new(VPC_URL, "v1.0.0"))],
    );
    let used = UsedModules::new(
        &scan_root,
        BTreeMap::from([(
            "vpc".to_string(),
            "../../vendor/terraform-aws-vpc//modules/subnets".to_string(),
        )]),
    );

    harness.run(&manifest, Some(&used)).unwrap();

    assert_eq!(
        harness.git.clones()[0].2,
        scan_root.join("../../vendor/terraform-aws-vpc")
    );
}

#[test]
fn test_entries_are_processed_in_name_order() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(FakeGit::default());
    let manifest = manifest(
        temp.path(),
        &[
            ("zeta", ManifestEntry::new(VPC_URL, "main")),
            ("alpha", ManifestEntry::new(VPC_URL, "main")),
        ],
    );

    let report = harness.run(&manifest, None).unwrap();

    let names: Vec<&str> = report.outcomes().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert_eq!(harness.lines(), vec!["fetch alpha main", "fetch zeta main"]);
}
