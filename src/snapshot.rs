//! Snapshot construction: the heart of the publish pipeline
//!
//! [`SnapshotBuilder`] turns a source workspace (manifest + lock file +
//! vendored package tree) into one immutable, self-contained version
//! directory under the artifact store:
//!
//! 1. Both descriptor files must exist before anything is mutated.
//! 2. The manifest is parsed and stamped with the publish timestamp.
//! 3. Workspace submodules are resolved so vendored packages are populated.
//! 4. The whole snapshot is built in a staging directory next to its final
//!    location, then promoted with a single atomic rename. A crash mid-build
//!    never leaves a half-built version visible to readers.
//! 5. Locally-vendored packages are copied from the merged library tree
//!    (dotfile entries skipped); git-sourced lock entries are shallow-cloned
//!    at their pinned commit in parallel, with bounded retries.
//!
//! Merge rule: when a package id exists both in the library tree and as a
//! git lock entry, the externally-cloned content wins - clones land after
//! the local copies and replace the directory wholesale.

use crate::constants::MAX_FETCH_ATTEMPTS;
use crate::core::SdkError;
use crate::index::VersionIndex;
use crate::lockfile::{GitDependency, PackagesLock};
use crate::manifest::SdkManifest;
use crate::store::ArtifactStore;
use crate::utils::backoff::exponential_backoff_with_delay;
use crate::utils::fs::{copy_dir, ensure_dir, remove_dir_all};
use crate::utils::progress::ProgressBar;
use crate::workspace::SourceWorkspace;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builds one version snapshot from a source workspace into an artifact
/// store.
pub struct SnapshotBuilder<'a> {
    workspace: &'a SourceWorkspace,
    store: &'a ArtifactStore,
    max_parallel: usize,
}

impl<'a> SnapshotBuilder<'a> {
    /// Creates a builder with the given fetch parallelism bound.
    #[must_use]
    pub fn new(workspace: &'a SourceWorkspace, store: &'a ArtifactStore, max_parallel: usize) -> Self {
        Self {
            workspace,
            store,
            max_parallel: max_parallel.max(1),
        }
    }

    /// Runs the full snapshot build and returns the resolved version id and
    /// the stamped manifest, ready for the version catalog update.
    ///
    /// # Errors
    ///
    /// - [`SdkError::ConfigMissing`] / [`SdkError::LockMissing`] when a
    ///   descriptor file is absent (checked before any mutation)
    /// - [`SdkError::ConfigParseError`] / [`SdkError::LockParseError`] on
    ///   malformed descriptors
    /// - [`SdkError::PathNotFound`] when the merged library tree is missing
    /// - [`SdkError::FetchFailed`] when an external package cannot be
    ///   fetched after all retry attempts
    pub async fn build(&self) -> Result<(String, SdkManifest)> {
        // Descriptors first: both must exist before touching the store.
        let mut manifest = SdkManifest::load(&self.workspace.manifest_path())?;
        let lock = PackagesLock::load(&self.workspace.lock_path())?;

        manifest.stamp();
        let version = manifest.version.clone();
        info!("building snapshot for version {version}");

        self.workspace.resolve_submodules().await?;

        let final_dir = self.store.version_dir(&version);
        let stage = StageDir::create(self.store.root())?;

        manifest.save(&stage.path().join(crate::constants::SDK_CONFIG_JSON))?;

        let local_packages = self.copy_local_packages(stage.path())?;

        let git_deps = lock.git_dependencies();
        self.warn_unresolvable(&manifest, &local_packages, &git_deps);
        self.fetch_external_packages(stage.path(), git_deps).await?;

        self.promote(stage, &final_dir, &version)?;

        Ok((version, manifest))
    }

    /// Copies every package directory from the merged library tree into the
    /// staging dir, skipping dotfile entries and plain files. Returns the
    /// set of copied package ids.
    fn copy_local_packages(&self, stage: &Path) -> Result<BTreeSet<String>> {
        let lib_tree = self.workspace.library_tree();
        if !lib_tree.exists() {
            return Err(SdkError::PathNotFound {
                path: lib_tree.display().to_string(),
            }
            .into());
        }

        let mut copied = BTreeSet::new();
        for entry in std::fs::read_dir(&lib_tree)
            .with_context(|| format!("Failed to read library tree: {}", lib_tree.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                // Tooling artifacts, not package content.
                continue;
            }

            debug!("copying local package {name}");
            copy_dir(&entry.path(), &stage.join(&name))?;
            copied.insert(name);
        }

        Ok(copied)
    }

    /// A manifest-declared package with neither a local directory nor a lock
    /// entry is skipped with a warning; the publish proceeds with a smaller
    /// artifact.
    fn warn_unresolvable(
        &self,
        manifest: &SdkManifest,
        local: &BTreeSet<String>,
        git_deps: &[GitDependency],
    ) {
        for package in &manifest.packages {
            if !local.contains(package) && !git_deps.iter().any(|d| &d.package == package) {
                warn!("package [{package}] not found, skip install...");
            }
        }
    }

    /// Clones every git-sourced lock entry at its pinned commit, bounded by
    /// `max_parallel`, each with retry and backoff.
    async fn fetch_external_packages(
        &self,
        stage: &Path,
        deps: Vec<GitDependency>,
    ) -> Result<()> {
        if deps.is_empty() {
            return Ok(());
        }

        let progress = ProgressBar::new(deps.len() as u64);
        progress.set_prefix("fetch");

        let results: Vec<Result<()>> = stream::iter(deps.into_iter().map(|dep| {
            let dest = stage.join(&dep.package);
            let progress = &progress;
            async move {
                let result = fetch_pinned(&dep, &dest).await;
                progress.inc(1);
                if result.is_ok() {
                    progress.set_message(dep.package.clone());
                }
                result
            }
        }))
        .buffer_unordered(self.max_parallel)
        .collect()
        .await;

        progress.finish_and_clear();

        // Surface the first failure; the rest were already logged.
        results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Removes any previous snapshot for this version and renames the
    /// staging dir into place. The rename is the atomic step; the removal
    /// only ever destroys an OLD snapshot, never exposes a half-built one.
    fn promote(&self, stage: StageDir, final_dir: &Path, version: &str) -> Result<()> {
        if final_dir.exists() {
            let index = VersionIndex::load(self.store.root()).unwrap_or_default();
            if index.versions.contains_key(version) {
                warn!("replacing already-published snapshot for version {version}");
            }
            remove_dir_all(final_dir)?;
        }

        std::fs::rename(stage.path(), final_dir).with_context(|| {
            format!(
                "Failed to promote snapshot {} -> {}",
                stage.path().display(),
                final_dir.display()
            )
        })?;
        stage.disarm();
        Ok(())
    }
}

/// Clones one pinned external package into `dest`, retrying with
/// exponential backoff up to [`MAX_FETCH_ATTEMPTS`].
async fn fetch_pinned(dep: &GitDependency, dest: &Path) -> Result<()> {
    let mut attempt: u32 = 0;
    loop {
        match try_fetch_once(dep, dest).await {
            Ok(()) => {
                info!("fetched {} at {}", dep.package, short_hash(&dep.hash));
                return Ok(());
            }
            Err(e) if attempt + 1 < MAX_FETCH_ATTEMPTS => {
                warn!(
                    "fetch of {} failed (attempt {}/{MAX_FETCH_ATTEMPTS}): {e:#}",
                    dep.package,
                    attempt + 1
                );
                attempt = exponential_backoff_with_delay(attempt).await;
            }
            Err(e) => {
                warn!("giving up on {} after {MAX_FETCH_ATTEMPTS} attempts: {e:#}", dep.package);
                return Err(SdkError::FetchFailed {
                    package: dep.package.clone(),
                    url: dep.url.clone(),
                    attempts: MAX_FETCH_ATTEMPTS,
                }
                .into());
            }
        }
    }
}

/// One fetch attempt: clean destination, shallow clone, pin to the hash,
/// strip the nested `.git` so the snapshot is self-contained.
async fn try_fetch_once(dep: &GitDependency, dest: &Path) -> Result<()> {
    remove_dir_all(dest)?;
    ensure_dir(dest.parent().unwrap_or(dest))?;

    debug!("clone {}: {} -> {}", dep.package, dep.url, dest.display());
    let repo = crate::git::GitRepo::clone_shallow(&dep.url, dest).await?;
    if !dep.hash.is_empty() {
        repo.checkout_with_context(&dep.hash, &dep.package).await?;
    }
    remove_dir_all(&dest.join(".git"))?;
    Ok(())
}

fn short_hash(hash: &str) -> &str {
    if hash.len() > 8 { &hash[..8] } else { hash }
}

/// Staging directory under the store root, removed on drop unless the
/// snapshot was promoted. Lives next to the final version directory so the
/// promoting rename stays on one filesystem.
struct StageDir {
    path: PathBuf,
    armed: bool,
}

impl StageDir {
    fn create(store_root: &Path) -> Result<Self> {
        let path = store_root.join(format!(".stage-{}", uuid::Uuid::new_v4()));
        ensure_dir(&path)?;
        Ok(Self { path, armed: true })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StageDir {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                if self.path.exists() {
                    warn!("failed to clean staging dir {}: {e}", self.path.display());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stage_dir_removed_on_drop() {
        let temp = tempdir().unwrap();
        let stage_path;
        {
            let stage = StageDir::create(temp.path()).unwrap();
            stage_path = stage.path().to_path_buf();
            assert!(stage_path.is_dir());
        }
        assert!(!stage_path.exists());
    }

    #[test]
    fn test_stage_dir_survives_disarm() {
        let temp = tempdir().unwrap();
        let stage = StageDir::create(temp.path()).unwrap();
        let stage_path = stage.path().to_path_buf();
        stage.disarm();
        assert!(stage_path.is_dir());
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("deadbeefcafe"), "deadbeef");
        assert_eq!(short_hash("abc"), "abc");
    }
}
