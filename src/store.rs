//! The artifact store: a git-backed directory of published version snapshots
//!
//! Layout of a checkout of the library repository:
//!
//! ```text
//! <root>/
//!   version_list.json       # the version catalog
//!   1.0.0/                  # one immutable snapshot per published version
//!     sdk-config.json
//!     com.guru.core/
//!     com.guru.ads/
//!   1.1.0/
//!     ...
//! ```
//!
//! [`ArtifactStore`] owns the path layout and the commit-and-push step that
//! publishes a finished snapshot. Snapshot construction itself lives in
//! [`crate::snapshot`].

use crate::git::GitRepo;
use crate::index::VersionIndex;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Handle to a checkout of the published library repository.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Wraps an existing checkout directory.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one version snapshot.
    #[must_use]
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Path of the version catalog file.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        VersionIndex::path_in(&self.root)
    }

    /// Git handle over the checkout.
    #[must_use]
    pub fn repo(&self) -> GitRepo {
        GitRepo::new(&self.root)
    }

    /// Commits everything and pushes, with the same commit message format
    /// the publish job has always used.
    pub async fn commit_and_push(&self, version: &str) -> Result<()> {
        let date = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
        let message = format!("Make version {version} on {date} by push");
        let repo = self.repo();
        repo.commit_all(&message).await?;
        repo.push().await
    }
}
