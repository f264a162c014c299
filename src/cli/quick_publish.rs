//! Publish directly from a local dev Unity project checkout.
//!
//! The source workspace is the parent directory of the given Unity project;
//! the library repository is cloned into the user's scratch area and
//! removed again after the push.

use crate::config::Config;
use crate::core::SdkError;
use crate::publish::quick_publish;
use crate::utils::status::StatusLog;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Publish from a local dev Unity project.
#[derive(Args)]
pub struct QuickPublishCommand {
    /// Path of the dev Unity project inside the workspace checkout.
    #[arg(short, long)]
    pub proj: Option<String>,

    /// Maximum number of concurrent external package fetches.
    #[arg(long)]
    pub max_parallel: Option<usize>,
}

impl QuickPublishCommand {
    /// Validates the source path and runs the quick-publish pipeline.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let proj = self
            .proj
            .as_deref()
            .map(|p| p.trim_end_matches(['/', '\\']))
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| SdkError::WrongSourcePath {
                path: self.proj.clone().unwrap_or_default(),
            })?;

        let config = super::publish::apply_max_parallel(config, self.max_parallel)?;

        let status = StatusLog::for_current_dir()?;
        status.clear()?;

        match quick_publish(&config, &PathBuf::from(proj)).await {
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
