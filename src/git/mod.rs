//! Git operations wrapper for the GuruSDK CLI
//!
//! A safe, async wrapper around the system `git` command. Like Cargo with
//! `git-fetch-with-cli`, the tool shells out to the installed git binary
//! rather than embedding a Git library, so SSH agents, credential helpers
//! and platform-specific authentication all work unchanged - which matters
//! because both SDK repositories are accessed over SSH in CI.
//!
//! [`GitRepo`] is a thin handle over a working directory; every method
//! delegates to the [`GitCommand`] builder, which owns timeouts, logging
//! and typed error mapping.

pub mod command_builder;

pub use command_builder::{GitCommand, GitCommandOutput};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Handle to a git working directory.
///
/// Holds only the path; all state queries go to git itself. Cloning returns
/// a `GitRepo` for the fresh checkout so follow-up operations (checkout,
/// submodule resolution, commit) chain naturally.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Wraps an existing directory. No validation is performed here; the
    /// first git operation will fail if the directory is not a repository.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Shallow-clones `url` into `target` (depth 1).
    ///
    /// Used both for pinning external packages and for the
    /// delete-and-reclone local cache mirror.
    pub async fn clone_shallow(url: &str, target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone_shallow(url, target).execute_success().await?;
        Ok(Self::new(target))
    }

    /// Shallow-clones a specific branch of `url` into `target`.
    pub async fn clone_branch(url: &str, branch: &str, target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone_branch(url, branch, target).execute_success().await?;
        Ok(Self::new(target))
    }

    /// Fully clones `url` into `target`, keeping history so the checkout can
    /// be committed to and pushed.
    pub async fn clone_full(url: &str, target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone_full(url, target).execute_success().await?;
        Ok(Self::new(target))
    }

    /// Checks out an exact reference (commit hash, tag or branch).
    pub async fn checkout(&self, reference: &str) -> Result<()> {
        GitCommand::checkout(reference)
            .current_dir(&self.path)
            .execute_success()
            .await
    }

    /// Checks out an exact reference, tagging log output with `context`.
    pub async fn checkout_with_context(&self, reference: &str, context: &str) -> Result<()> {
        GitCommand::checkout(reference)
            .current_dir(&self.path)
            .with_context(context)
            .execute_success()
            .await
    }

    /// Resolves all submodules recursively
    /// (`git submodule update --init --recursive`).
    pub async fn update_submodules(&self) -> Result<()> {
        GitCommand::submodule_update()
            .current_dir(&self.path)
            .execute_success()
            .await
    }

    /// Stages everything and commits with `message`.
    pub async fn commit_all(&self, message: &str) -> Result<()> {
        GitCommand::add(".").current_dir(&self.path).execute_success().await?;
        GitCommand::commit(message).current_dir(&self.path).execute_success().await
    }

    /// Pushes the current branch to its upstream.
    pub async fn push(&self) -> Result<()> {
        GitCommand::push().current_dir(&self.path).execute_success().await
    }

    /// Current commit hash of the working directory.
    pub async fn current_commit(&self) -> Result<String> {
        GitCommand::current_commit().current_dir(&self.path).execute_stdout().await
    }

    /// Whether the directory looks like a git checkout.
    #[must_use]
    pub fn is_git_repo(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Path of the working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
