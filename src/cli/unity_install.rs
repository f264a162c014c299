//! Install the SDK version a Unity project pins in its installer settings.
//!
//! The Unity editor plugin writes `ProjectSettings/guru-sdk-installer.json`
//! with the version a project should use; this command reads it and runs
//! the same flow as `install`.

use crate::cli::install::run_sync_and_install;
use crate::config::Config;
use crate::core::SdkError;
use crate::installer::InstallerSettings;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Install the version pinned in the project's guru-sdk-installer.json.
#[derive(Args)]
pub struct UnityInstallCommand {
    /// Path of the target Unity project.
    #[arg(short, long)]
    pub proj: PathBuf,
}

impl UnityInstallCommand {
    /// Reads the pinned version and runs the sync-and-install flow.
    pub async fn execute(&self, config: &Config) -> Result<()> {
        if !self.proj.exists() {
            return Err(SdkError::ProjectNotFound {
                path: self.proj.display().to_string(),
            }
            .into());
        }

        let settings = InstallerSettings::load(&self.proj)?;
        run_sync_and_install(config, &self.proj, &settings.install_version).await
    }
}
