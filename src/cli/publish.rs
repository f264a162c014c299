//! Publish a new SDK version from a branch of the dev repository (CI flow).
//!
//! Clones both repositories into `source/` and `output/` work directories
//! under the invocation directory, builds the version snapshot, registers
//! it in the version catalog, then commits and pushes the library
//! repository.

use crate::config::Config;
use crate::core::SdkError;
use crate::publish::publish_from_branch;
use crate::utils::status::StatusLog;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Validates and applies the `--max-parallel` override.
pub(crate) fn apply_max_parallel(config: &Config, max_parallel: Option<usize>) -> Result<Config> {
    match max_parallel {
        Some(0) => Err(SdkError::WrongArgs {
            reason: "--max-parallel must be at least 1".to_string(),
        }
        .into()),
        Some(n) => Ok(config.clone().with_max_parallel(n)),
        None => Ok(config.clone()),
    }
}

/// Publish a new SDK version from a branch of the dev repository.
#[derive(Args)]
pub struct PublishCommand {
    /// Branch of the dev repository to publish from.
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Maximum number of concurrent external package fetches.
    #[arg(long)]
    pub max_parallel: Option<usize>,
}

impl PublishCommand {
    /// Runs the CI publish pipeline in the current directory.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let config = apply_max_parallel(config, self.max_parallel)?;

        let status = StatusLog::for_current_dir()?;
        status.clear()?;

        let work_dir = std::env::current_dir()?;
        match publish_from_branch(&config, &work_dir, &self.branch).await {
            Ok(version) => {
                status.success(&format!("published {version}"))?;
                println!("{} Published SDK version {}", "✓".green(), version.bold());
                Ok(())
            }
            Err(e) => {
                status.failed(&format!("{e}"))?;
                Err(e)
            }
        }
    }
}
