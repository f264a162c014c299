//! The source workspace: a checkout of the SDK development repository
//!
//! Layout of the dev repository relevant to publishing:
//!
//! ```text
//! <root>/
//!   GuruSDKDev/                       # the dev Unity project
//!     Packages/
//!       sdk-config.json               # the release manifest
//!       packages-lock.json            # Unity's dependency lock file
//!   packages/
//!     com.guru.unity.sdk.v2/          # merged library tree
//!       com.guru.core/                # one dir per locally-vendored package
//!       com.guru.ads/
//! ```
//!
//! Locally-vendored package directories are populated by git submodules, so
//! the workspace exposes a submodule-resolution step the snapshot builder
//! runs before copying anything.

use crate::constants::{
    PACKAGES_LOCK_JSON, SDK_CONFIG_JSON, SDK_LIB_COMBINED, UNITY_DEV_PROJECT, UNITY_PACKAGES_ROOT,
    WORKSPACE_PACKAGES_DIR,
};
use crate::git::GitRepo;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Handle to a checkout of the SDK development repository.
#[derive(Debug, Clone)]
pub struct SourceWorkspace {
    root: PathBuf,
}

impl SourceWorkspace {
    /// Wraps an existing checkout directory.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Workspace root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The dev Unity project's `Packages/` directory, which holds both
    /// descriptor files.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(UNITY_DEV_PROJECT).join(UNITY_PACKAGES_ROOT)
    }

    /// Path of the release manifest (`sdk-config.json`).
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.packages_dir().join(SDK_CONFIG_JSON)
    }

    /// Path of the dependency lock file (`packages-lock.json`).
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.packages_dir().join(PACKAGES_LOCK_JSON)
    }

    /// The merged library tree holding one directory per locally-vendored
    /// package.
    #[must_use]
    pub fn library_tree(&self) -> PathBuf {
        self.root.join(WORKSPACE_PACKAGES_DIR).join(SDK_LIB_COMBINED)
    }

    /// Resolves all submodules recursively so the locally-vendored package
    /// directories are populated before copying.
    pub async fn resolve_submodules(&self) -> Result<()> {
        GitRepo::new(&self.root).update_submodules().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let ws = SourceWorkspace::new("/dev");
        assert_eq!(
            ws.manifest_path(),
            PathBuf::from("/dev/GuruSDKDev/Packages/sdk-config.json")
        );
        assert_eq!(
            ws.lock_path(),
            PathBuf::from("/dev/GuruSDKDev/Packages/packages-lock.json")
        );
        assert_eq!(
            ws.library_tree(),
            PathBuf::from("/dev/packages/com.guru.unity.sdk.v2")
        );
        assert_eq!(ws.root(), Path::new("/dev"));
    }
}
