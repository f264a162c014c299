//! The client-side local SDK cache and the sync-and-install composition
//!
//! Every client machine keeps one checkout of the published library
//! repository under the configured SDK home. The cache is a *replaceable*
//! mirror: syncing always deletes the whole checkout and shallow-clones it
//! again, so there is no partial-merge state to reason about - at the cost
//! of a full-bandwidth resync.
//!
//! [`sync_and_install`] is the complete client flow: make sure the cache
//! holds the requested version (consulting the remote staleness oracle when
//! it might), then link the snapshot into the target project.

use crate::config::Config;
use crate::git::GitRepo;
use crate::index::VersionIndex;
use crate::installer;
use crate::core::SdkError;
use crate::utils::fs::{ensure_dir, remove_dir_all};
use crate::utils::progress::ProgressBar;
use crate::version_check::UpdateChecker;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle to the local mirror of the published library repository.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
    lib_repo: String,
}

impl LocalCache {
    /// Cache handle for the configured SDK home.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.sdk_home.clone(),
            lib_repo: config.lib_repo.clone(),
        }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one cached version snapshot.
    #[must_use]
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Path of the locally cached version catalog.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        VersionIndex::path_in(&self.root)
    }

    /// Loads the locally cached catalog, or `None` when the cache has never
    /// been synced.
    pub fn load_index(&self) -> Result<Option<VersionIndex>> {
        if !self.index_path().exists() {
            return Ok(None);
        }
        Ok(Some(VersionIndex::load(&self.root)?))
    }

    /// Replaces the whole mirror: delete, recreate, shallow-clone.
    pub async fn sync(&self) -> Result<()> {
        info!("syncing SDK into {}", self.root.display());
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("Cloning SDK into {}", self.root.display()));

        remove_dir_all(&self.root)?;
        ensure_dir(&self.root)?;
        let result = GitRepo::clone_shallow(&self.lib_repo, &self.root).await;

        spinner.finish_and_clear();
        result?;
        Ok(())
    }
}

/// Full client flow: ensure the cache is current for `version`, then link
/// the snapshot into `project`.
///
/// # Errors
///
/// [`SdkError::PathNotFound`] when no version catalog exists even after a
/// full resync (the requested version cannot exist without one); plus any
/// error from the install step.
pub async fn sync_and_install(
    cache: &LocalCache,
    checker: &UpdateChecker,
    project: &Path,
    version: &str,
) -> Result<()> {
    match cache.load_index()? {
        None => {
            // First use on this machine: fetch the mirror, then re-check.
            cache.sync().await?;
            if cache.load_index()?.is_none() {
                return Err(SdkError::PathNotFound {
                    path: cache.index_path().display().to_string(),
                }
                .into());
            }
        }
        Some(local_index) => {
            let need_sync = match local_index.versions.get(version) {
                Some(entry) => checker.should_update(version, &entry.ts.to_string()).await,
                // Unknown locally; it may exist remotely but not here yet.
                None => true,
            };
            if need_sync {
                cache.sync().await?;
            } else {
                debug!("local cache for version {version} is current");
            }
        }
    }

    installer::install_snapshot(&cache.version_dir(version), project)
}
