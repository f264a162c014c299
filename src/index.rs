//! The published version catalog (`version_list.json`)
//!
//! A single JSON document at the root of the library repository mapping every
//! published version to its publish timestamp and description, plus a
//! `latest` pointer. Entries are upserted, never removed; `latest` is
//! whatever was published most recently, with no semantic-version ordering.
//! There is no locking: the catalog assumes a single publisher at a time.

use crate::constants::{DEFAULT_DESCRIPTION, VERSION_LIST_JSON};
use crate::utils::fs::{read_json_file, write_json_file};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Catalog entry for one published version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Publish time, UTC epoch seconds.
    pub ts: i64,
    /// Human description from the manifest, or a placeholder.
    pub desc: String,
}

/// Parsed `version_list.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionIndex {
    /// The most recently published version id (last write wins).
    #[serde(default)]
    pub latest: String,
    /// Every published version, keyed by version id.
    #[serde(default)]
    pub versions: BTreeMap<String, VersionEntry>,
}

impl VersionIndex {
    /// Path of the catalog file inside a store root.
    #[must_use]
    pub fn path_in(store_root: &Path) -> PathBuf {
        store_root.join(VERSION_LIST_JSON)
    }

    /// Loads the catalog from a store root, or the empty default when the
    /// file does not exist yet (first publish into a fresh store).
    pub fn load(store_root: &Path) -> Result<Self> {
        let path = Self::path_in(store_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        read_json_file(&path)
    }

    /// Records a publish: `latest` is set unconditionally and the version's
    /// entry is upserted with a fresh timestamp.
    ///
    /// Republishing an existing id overwrites its entry; that is the
    /// documented policy, but it is worth a warning in CI logs.
    pub fn record(&mut self, version: &str, desc: &str) {
        if self.versions.contains_key(version) {
            tracing::warn!("version '{version}' is already registered, overwriting its entry");
        }

        let desc = if desc.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            desc.to_string()
        };

        self.latest = version.to_string();
        self.versions.insert(
            version.to_string(),
            VersionEntry {
                ts: chrono::Utc::now().timestamp(),
                desc,
            },
        );
    }

    /// Persists the catalog into a store root (atomic write-then-rename).
    pub fn save(&self, store_root: &Path) -> Result<()> {
        write_json_file(&Self::path_in(store_root), self, false)
    }
}
