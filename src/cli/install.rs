//! Install one published SDK version into a Unity project.
//!
//! Runs the full client flow: consult the local version catalog, ask the
//! remote staleness oracle whether the cache must be re-synced, then link
//! the requested snapshot into the project's `Packages/` directory.

use crate::cache::{self, LocalCache};
use crate::config::Config;
use crate::core::SdkError;
use crate::utils::status::StatusLog;
use crate::version_check::UpdateChecker;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Sync (when stale) and link one SDK version into a Unity project.
#[derive(Args)]
pub struct InstallCommand {
    /// Path of the target Unity project.
    #[arg(short, long)]
    pub proj: PathBuf,

    /// Published SDK version to install (exact version id).
    #[arg(long)]
    pub version: String,
}

impl InstallCommand {
    /// Validates the arguments and runs the sync-and-install flow.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        if !self.proj.exists() {
            return Err(SdkError::ProjectNotFound {
                path: self.proj.display().to_string(),
            }
            .into());
        }
        if self.version.trim().is_empty() {
            return Err(SdkError::WrongVersion {
                version: self.version.clone(),
            }
            .into());
        }

        run_sync_and_install(config, &self.proj, &self.version).await
    }
}

/// Shared by `install` and `unity-install`: run the flow and record the
/// outcome in `log.txt` for the editor integration.
pub(crate) async fn run_sync_and_install(
    config: &Config,
    proj: &std::path::Path,
    version: &str,
) -> Result<()> {
    let status = StatusLog::for_current_dir()?;
    status.clear()?;

    let cache = LocalCache::new(config);
    let checker = UpdateChecker::new(config)?;

    match cache::sync_and_install(&cache, &checker, proj, version).await {
        Ok(()) => {
            status.success("install complete")?;
            println!("{} SDK {} installed into {}", "✓".green(), version, proj.display());
            Ok(())
        }
        Err(e) => {
            status.failed(&format!("{e}"))?;
            Err(e)
        }
    }
}
