//! Unity's machine-generated dependency lock file (`packages-lock.json`)
//!
//! The lock file records every dependency the Unity editor resolved for the
//! dev project. The publish pipeline only acts on entries whose `source` is
//! `"git"`: those are cloned from their pinned URL and checked out at the
//! recorded commit hash. Everything else is assumed to already be
//! materialized by the workspace's submodule step. Entries may be `null`
//! (Unity writes these for packages it dropped) and are skipped silently.

use crate::core::SdkError;
use crate::utils::fs::read_text_file;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One resolved dependency in the lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockEntry {
    /// Where the dependency came from; only `"git"` entries are fetched.
    #[serde(default)]
    pub source: String,

    /// For git entries, the URL in `<url>` or `<url>#<ref>` form.
    #[serde(default)]
    pub version: String,

    /// Pinned commit hash for exact reproduction.
    #[serde(default)]
    pub hash: String,

    /// Fields this tool does not interpret (e.g. `depth`, `dependencies`).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An external dependency extracted from a git-sourced lock entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDependency {
    /// Package identifier (the lock file key).
    pub package: String,
    /// Clone URL with any `#ref` suffix stripped.
    pub url: String,
    /// Optional ref that followed the `#` in the version field.
    pub reference: Option<String>,
    /// Commit hash to check out after cloning.
    pub hash: String,
}

/// Parsed `packages-lock.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagesLock {
    /// Package identifier to entry; `None` for nulled-out entries.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Option<LockEntry>>,
}

impl PackagesLock {
    /// Loads a lock file.
    ///
    /// # Errors
    ///
    /// - [`SdkError::LockMissing`] when the file does not exist
    /// - [`SdkError::LockParseError`] on malformed JSON
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SdkError::LockMissing {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = read_text_file(path)?;
        let lock: Self = serde_json::from_str(&content).map_err(|e| SdkError::LockParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(lock)
    }

    /// Extracts every git-sourced dependency, splitting `url#ref` on the
    /// first `#`. Null entries and non-git sources are skipped.
    #[must_use]
    pub fn git_dependencies(&self) -> Vec<GitDependency> {
        self.dependencies
            .iter()
            .filter_map(|(package, entry)| {
                let entry = match entry {
                    Some(entry) => entry,
                    None => {
                        tracing::trace!("lock entry for '{package}' is null, skipping");
                        return None;
                    }
                };
                if entry.source != "git" {
                    return None;
                }

                let (url, reference) = match entry.version.split_once('#') {
                    Some((url, r)) => (url.to_string(), Some(r.to_string())),
                    None => (entry.version.clone(), None),
                };

                Some(GitDependency {
                    package: package.clone(),
                    url,
                    reference,
                    hash: entry.hash.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LOCK: &str = r#"{
        "dependencies": {
            "com.guru.ads": {
                "source": "git",
                "version": "https://github.com/castbox/ads.git#v1.4",
                "hash": "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef",
                "depth": 0
            },
            "com.guru.core": {
                "source": "embedded",
                "version": "file:com.guru.core"
            },
            "com.unity.dropped": null
        }
    }"#;

    #[test]
    fn test_load_and_extract_git_dependencies() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("packages-lock.json");
        std::fs::write(&path, LOCK).unwrap();

        let lock = PackagesLock::load(&path).unwrap();
        let deps = lock.git_dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].package, "com.guru.ads");
        assert_eq!(deps[0].url, "https://github.com/castbox/ads.git");
        assert_eq!(deps[0].reference.as_deref(), Some("v1.4"));
        assert_eq!(deps[0].hash, "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef");
    }

    #[test]
    fn test_url_without_ref() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("packages-lock.json");
        std::fs::write(
            &path,
            r#"{"dependencies": {"com.x": {"source": "git", "version": "https://x.git", "hash": "abc"}}}"#,
        )
        .unwrap();

        let deps = PackagesLock::load(&path).unwrap().git_dependencies();
        assert_eq!(deps[0].url, "https://x.git");
        assert!(deps[0].reference.is_none());
    }

    #[test]
    fn test_missing_lock_is_lock_missing() {
        let temp = tempdir().unwrap();
        let err = PackagesLock::load(&temp.path().join("absent.json")).unwrap_err();
        let sdk = err.downcast_ref::<SdkError>().unwrap();
        assert!(matches!(sdk, SdkError::LockMissing { .. }));
        assert_eq!(sdk.exit_code(), 105);
    }

    #[test]
    fn test_malformed_lock_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("packages-lock.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = PackagesLock::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SdkError>().unwrap(),
            SdkError::LockParseError { .. }
        ));
    }
}
