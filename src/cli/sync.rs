//! Sync the local SDK cache to the latest published state.
//!
//! The cache is a replaceable mirror: sync always deletes the whole checkout
//! and clones it again, so a client can never be left with a partially
//! merged cache.

use crate::cache::LocalCache;
use crate::config::Config;
use crate::utils::status::StatusLog;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Delete and re-clone the local SDK cache.
#[derive(Args)]
pub struct SyncCommand {}

impl SyncCommand {
    /// Runs the sync and records the outcome in `log.txt`.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let status = StatusLog::for_current_dir()?;
        status.clear()?;

        let cache = LocalCache::new(config);
        match cache.sync().await {
            Ok(()) => {
                status.success("sync complete")?;
                println!("{} SDK synced into {}", "✓".green(), cache.root().display());
                Ok(())
            }
            Err(e) => {
                status.failed(&format!("{e}"))?;
                Err(e)
            }
        }
    }
}
