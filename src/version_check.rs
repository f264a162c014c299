//! Remote staleness check against the published version catalog
//!
//! A client deciding whether its local SDK cache is current fetches the
//! published `version_list.json` over HTTP and compares the catalog's
//! timestamp for the requested version with the one it cached locally.
//! Timestamp equality is a cheap proxy for content equality: snapshots are
//! immutable once registered, so a matching token means matching content.
//!
//! The check is deliberately conservative: any failure to reach or parse the
//! remote catalog means "assume stale, resync" - logged as a warning, never
//! surfaced as an error.

use crate::config::Config;
use crate::constants::HTTP_TIMEOUT;
use crate::index::VersionIndex;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Client-side staleness oracle.
pub struct UpdateChecker {
    client: reqwest::Client,
    url: String,
}

impl UpdateChecker {
    /// Creates a checker pointed at the configured catalog URL.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: config.version_list_url.clone(),
        })
    }

    /// Decides whether the local cache must be refreshed for `version`.
    ///
    /// Returns `true` (refetch) when either argument is empty, when the
    /// remote catalog cannot be fetched, when the version is absent from it,
    /// or when its remote timestamp differs from `local_ts`. Returns `false`
    /// only on an exact timestamp match.
    pub async fn should_update(&self, version: &str, local_ts: &str) -> bool {
        if version.trim().is_empty() || local_ts.trim().is_empty() {
            return true;
        }

        match self.fetch_remote_index().await {
            Ok(index) => evaluate(&index, version, local_ts),
            Err(e) => {
                warn!("could not fetch remote version list, assuming stale: {e:#}");
                true
            }
        }
    }

    /// Fetches and parses the remote catalog.
    async fn fetch_remote_index(&self) -> Result<VersionIndex> {
        debug!("fetching version list from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch version list")?;

        if !response.status().is_success() {
            anyhow::bail!("version list request returned HTTP {}", response.status());
        }

        response.json().await.context("Failed to parse version list")
    }
}

/// Pure comparison step: stale unless the version exists remotely with a
/// timestamp string-equal to the locally cached one.
#[must_use]
pub fn evaluate(remote: &VersionIndex, version: &str, local_ts: &str) -> bool {
    match remote.versions.get(version) {
        Some(entry) => {
            let remote_ts = entry.ts.to_string();
            if remote_ts == local_ts {
                debug!("version [{version}] ts {local_ts} matches remote, no update needed");
                false
            } else {
                debug!("version [{version}] local ts {local_ts} != remote ts {remote_ts}");
                true
            }
        }
        None => {
            debug!("version [{version}] absent from remote list");
            true
        }
    }
}
