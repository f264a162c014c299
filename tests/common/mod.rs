//! Common test utilities and fixtures for GuruSDK CLI integration tests
//!
//! Builds real git repositories on disk (via the system git binary) so the
//! publish and install flows run against `file://` remotes instead of mocks.

// Allow dead code because these utilities are shared across test files and
// not every test file uses every helper.
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Point git identity at a test user through environment variables so
/// commits made by the code under test work without global git config.
pub fn set_git_identity_env() {
    unsafe {
        std::env::set_var("GIT_AUTHOR_NAME", "Test User");
        std::env::set_var("GIT_AUTHOR_EMAIL", "test@guru.example");
        std::env::set_var("GIT_COMMITTER_NAME", "Test User");
        std::env::set_var("GIT_COMMITTER_EMAIL", "test@guru.example");
    }
}

/// Git command runner for building test repositories.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    /// Create a new `TestGit` for the given repository path.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| format!("Failed to run git {args:?}"))?;
        if !output.status.success() {
            anyhow::bail!(
                "git {args:?} failed in {}: {}",
                self.repo_path.display(),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Initialize a repository with `main` as the initial branch and a test
    /// user configured.
    pub fn init(&self) -> Result<()> {
        self.run(&["init", "-b", "main"])?;
        self.run(&["config", "user.email", "test@guru.example"])?;
        self.run(&["config", "user.name", "Test User"])?;
        // file:// pushes into a checked-out branch need this.
        self.run(&["config", "receive.denyCurrentBranch", "ignore"])?;
        Ok(())
    }

    /// Stage everything and commit.
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.run(&["add", "."])?;
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    /// HEAD commit hash.
    pub fn head(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// Create and switch to a branch.
    pub fn branch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name])?;
        Ok(())
    }

    /// `file://` URL of this repository, clonable by the CLI under test.
    pub fn file_url(&self) -> String {
        format!("file://{}", self.repo_path.display())
    }
}

/// One external UPM package served from its own git repository.
///
/// The pinned hash in the lock file is the repository's HEAD, so shallow
/// clone plus checkout resolves exactly this content.
pub struct ExternalPackage {
    pub name: String,
    pub url: String,
    pub hash: String,
}

/// Create a git repository containing a minimal UPM package and return its
/// `file://` URL and HEAD hash.
pub fn make_external_package(root: &Path, name: &str) -> Result<ExternalPackage> {
    let repo_path = root.join(name);
    fs::create_dir_all(&repo_path)?;
    fs::write(
        repo_path.join("package.json"),
        format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#),
    )?;
    fs::write(repo_path.join("Runtime.cs"), "// runtime code\n")?;

    let git = TestGit::new(&repo_path);
    git.init()?;
    git.commit_all("Initial package content")?;

    Ok(ExternalPackage {
        name: name.to_string(),
        url: git.file_url(),
        hash: git.head()?,
    })
}

/// A dev-repository checkout on disk, ready for the snapshot builder.
///
/// Layout:
/// ```text
/// <root>/
///   GuruSDKDev/Packages/{sdk-config.json, packages-lock.json}
///   packages/com.guru.unity.sdk.v2/<pkg>/...
/// ```
pub struct WorkspaceFixture {
    pub root: PathBuf,
}

impl WorkspaceFixture {
    /// Create the directory skeleton and initialize the workspace as a git
    /// repository (submodule resolution requires one).
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("GuruSDKDev").join("Packages"))?;
        fs::create_dir_all(root.join("packages").join("com.guru.unity.sdk.v2"))?;

        let git = TestGit::new(&root);
        git.init()?;

        Ok(Self { root })
    }

    /// Write the release manifest.
    pub fn write_manifest(&self, version: &str, desc: &str, packages: &[&str]) -> Result<()> {
        let packages_json: Vec<String> = packages.iter().map(|p| format!(r#""{p}""#)).collect();
        let content = format!(
            r#"{{
  "version": "{version}",
  "desc": "{desc}",
  "packages": [{}]
}}"#,
            packages_json.join(", ")
        );
        fs::write(
            self.root
                .join("GuruSDKDev")
                .join("Packages")
                .join("sdk-config.json"),
            content,
        )?;
        Ok(())
    }

    /// Write a lock file with the given git-sourced dependencies; every
    /// other entry shape (registry deps, null entries) can be appended via
    /// `extra_lock_entries`.
    pub fn write_lock(&self, git_deps: &[&ExternalPackage]) -> Result<()> {
        self.write_lock_with_extra(git_deps, "")
    }

    /// Like [`write_lock`](Self::write_lock) but with raw extra JSON entries
    /// spliced into the dependencies object.
    pub fn write_lock_with_extra(&self, git_deps: &[&ExternalPackage], extra: &str) -> Result<()> {
        let mut entries: Vec<String> = git_deps
            .iter()
            .map(|dep| {
                format!(
                    r#"    "{}": {{
      "version": "{}#main",
      "source": "git",
      "hash": "{}",
      "depth": 0
    }}"#,
                    dep.name, dep.url, dep.hash
                )
            })
            .collect();
        if !extra.is_empty() {
            entries.push(extra.to_string());
        }

        let content = format!("{{\n  \"dependencies\": {{\n{}\n  }}\n}}", entries.join(",\n"));
        fs::write(
            self.root
                .join("GuruSDKDev")
                .join("Packages")
                .join("packages-lock.json"),
            content,
        )?;
        Ok(())
    }

    /// Add one locally-vendored package directory under the merged library
    /// tree with a marker file identifying its origin.
    pub fn add_local_package(&self, name: &str) -> Result<()> {
        let dir = self
            .root
            .join("packages")
            .join("com.guru.unity.sdk.v2")
            .join(name);
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name": "{name}", "version": "0.0.0-local"}}"#),
        )?;
        fs::write(dir.join("origin.txt"), "local")?;
        Ok(())
    }
}

/// A consumer Unity project directory with `Packages/manifest.json` and an
/// empty dependencies object.
pub struct UnityProjectFixture {
    pub root: PathBuf,
}

impl UnityProjectFixture {
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let packages = root.join("Packages");
        fs::create_dir_all(&packages)?;
        fs::write(packages.join("manifest.json"), "{\n  \"dependencies\": {}\n}")?;
        Ok(Self { root })
    }

    /// Pin a version in `ProjectSettings/guru-sdk-installer.json`.
    pub fn pin_version(&self, version: &str) -> Result<()> {
        let settings = self.root.join("ProjectSettings");
        fs::create_dir_all(&settings)?;
        fs::write(
            settings.join("guru-sdk-installer.json"),
            format!(r#"{{"install_version": "{version}"}}"#),
        )?;
        Ok(())
    }

    /// Parsed `Packages/manifest.json`.
    pub fn manifest(&self) -> Result<serde_json::Value> {
        let content = fs::read_to_string(self.root.join("Packages").join("manifest.json"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
