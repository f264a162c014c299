//! The developer-authored package manifest (`sdk-config.json`)
//!
//! The manifest names a release: its version string, a human description and
//! the ordered list of package identifiers that belong in it. It lives in the
//! dev Unity project under `GuruSDKDev/Packages/` and is read-only to the
//! pipeline except for the `ts` field injected at publish time, which is the
//! token downstream staleness checks compare against.
//!
//! Unknown fields are preserved on a round trip so the published copy of the
//! manifest stays faithful to what the developer wrote.

use crate::core::SdkError;
use crate::utils::fs::{read_text_file, write_json_file};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed `sdk-config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkManifest {
    /// Release version identifier, chosen by the publisher. Exact string,
    /// no semver range semantics anywhere in the system.
    pub version: String,

    /// Human description of the release, shown in the version catalog.
    #[serde(default, alias = "description")]
    pub desc: String,

    /// Ordered package identifiers included in this release.
    pub packages: Vec<String>,

    /// Publish timestamp (epoch seconds as a string), injected by
    /// [`SdkManifest::stamp`]. Absent in the authored file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,

    /// Fields this tool does not interpret, carried through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SdkManifest {
    /// Loads and validates a manifest file.
    ///
    /// # Errors
    ///
    /// - [`SdkError::ConfigMissing`] when the file does not exist
    /// - [`SdkError::ConfigParseError`] on malformed JSON, a missing
    ///   `version`/`packages` field, or an empty package identifier
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SdkError::ConfigMissing {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = read_text_file(path)?;
        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| SdkError::ConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(SdkError::ConfigParseError {
                file: path.display().to_string(),
                reason: "\"version\" must be a non-empty string".to_string(),
            }
            .into());
        }
        if self.packages.iter().any(|p| p.trim().is_empty()) {
            return Err(SdkError::ConfigParseError {
                file: path.display().to_string(),
                reason: "\"packages\" entries must be non-empty strings".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Injects the publish timestamp (current UTC epoch seconds).
    ///
    /// This value, not the wall time of any individual package resolution,
    /// is what clients later compare against the version catalog.
    pub fn stamp(&mut self) {
        self.ts = Some(chrono::Utc::now().timestamp().to_string());
    }

    /// Writes the manifest as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_file(path, self, true)
    }
}
