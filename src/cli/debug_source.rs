//! Clone both repositories and run the snapshot build without publishing.
//!
//! Useful for verifying that a branch of the dev repository produces a
//! complete snapshot before triggering a real publish: nothing is written
//! to the version catalog and nothing is pushed.

use crate::config::Config;
use crate::publish::debug_source;
use crate::utils::status::StatusLog;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Clone and build a snapshot for inspection only.
#[derive(Args)]
pub struct DebugSourceCommand {
    /// Branch of the dev repository to build from.
    #[arg(short, long, default_value = "main")]
    pub branch: String,
}

impl DebugSourceCommand {
    /// Clones both repositories into the current directory and builds.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let status = StatusLog::for_current_dir()?;
        status.clear()?;

        let work_dir = std::env::current_dir()?;
        match debug_source(config, &work_dir, &self.branch).await {
            Ok(version) => {
                status.success("download complete")?;
                println!(
                    "{} Built snapshot for version {} under {}",
                    "✓".green(),
                    version.bold(),
                    work_dir.join("output").display()
                );
                Ok(())
            }
            Err(e) => {
                status.failed(&format!("{e}"))?;
                Err(e)
            }
        }
    }
}
