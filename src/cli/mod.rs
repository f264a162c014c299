//! Command-line interface for the GuruSDK CLI.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! execution logic:
//!
//! ## Client commands
//! - `sync` - delete and re-clone the local SDK cache
//! - `install` - sync (when stale) and link one SDK version into a project
//! - `unity-install` - like `install`, with the version read from the
//!   project's `ProjectSettings/guru-sdk-installer.json`
//!
//! ## Publisher commands
//! - `publish` - CI flow: clone both repositories, build, register, push
//! - `quick-publish` - publish directly from a local dev Unity project
//! - `debug-source` - clone and build without registering or pushing
//!
//! # Global Options
//!
//! All commands support:
//! - `--verbose` / `--quiet` - log verbosity (mutually exclusive)
//! - `--no-progress` - disable progress bars and spinners
//! - `--sdk-home` - override the local SDK cache directory

mod debug_source;
mod install;
mod publish;
mod quick_publish;
mod sync;
mod unity_install;

use crate::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global CLI flags.
///
/// Holds what would otherwise be scattered environment mutations, so tests
/// and programmatic callers can inject behavior without touching global
/// state until [`CliConfig::apply`] runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set. `None` means quiet.
    pub log_level: Option<String>,

    /// Whether to disable progress indicators and animated output.
    pub no_progress: bool,
}

impl CliConfig {
    /// Applies the configuration to the process: installs the tracing
    /// subscriber and sets the progress-suppression variable. Call exactly
    /// once, before any command logic runs.
    pub fn apply(&self) {
        if self.no_progress {
            // Read by utils::progress for every bar created afterwards.
            unsafe {
                std::env::set_var("GURU_NO_PROGRESS", "1");
            }
        }

        let default_level = self.log_level.as_deref().unwrap_or("error");
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        // Ignore the error when a subscriber is already installed (tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    }
}

/// Top-level argument parser for the `guru-sdk` binary.
#[derive(Parser)]
#[command(
    name = "guru-sdk",
    about = "GuruSDK CLI - publish, sync and install versioned Unity SDK bundles",
    version,
    author,
    long_about = "Synchronizes, installs and publishes versioned bundles of Unity UPM \
                  packages between the SDK development repository, the published library \
                  repository and consumer Unity projects."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress bars and spinners (implied by --quiet).
    #[arg(long, global = true)]
    no_progress: bool,

    /// Override the local SDK cache directory (default: ~/.guru/unity/guru-sdk).
    #[arg(long, global = true, env = "GURU_SDK_HOME")]
    sdk_home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Delete and re-clone the local SDK cache to the latest published state.
    Sync(sync::SyncCommand),

    /// Sync (when stale) and link one published SDK version into a Unity project.
    Install(install::InstallCommand),

    /// Install the version pinned in the project's guru-sdk-installer.json.
    UnityInstall(unity_install::UnityInstallCommand),

    /// Publish a new SDK version from a branch of the dev repository (CI flow).
    Publish(publish::PublishCommand),

    /// Publish directly from a local dev Unity project checkout.
    QuickPublish(quick_publish::QuickPublishCommand),

    /// Clone both repositories and run the snapshot build without publishing.
    DebugSource(debug_source::DebugSourceCommand),
}

impl Cli {
    /// Executes the parsed command with configuration derived from the
    /// global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
        }
    }

    /// Executes with an injected [`CliConfig`] (used by tests).
    pub async fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        cli_config.apply();

        let mut config = Config::resolve()?;
        if let Some(ref sdk_home) = self.sdk_home {
            config = config.with_sdk_home(sdk_home);
        }

        match self.command {
            Commands::Sync(cmd) => cmd.execute(&config).await,
            Commands::Install(cmd) => cmd.execute(&config).await,
            Commands::UnityInstall(cmd) => cmd.execute(&config).await,
            Commands::Publish(cmd) => cmd.execute(&config).await,
            Commands::QuickPublish(cmd) => cmd.execute(&config).await,
            Commands::DebugSource(cmd) => cmd.execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_maps_to_debug() {
        let cli = Cli::parse_from(["guru-sdk", "--verbose", "sync"]);
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_quiet_disables_logging_and_progress() {
        let cli = Cli::parse_from(["guru-sdk", "--quiet", "sync"]);
        let config = cli.build_config();
        assert!(config.log_level.is_none());
        assert!(config.no_progress);
    }

    #[test]
    fn test_default_is_info() {
        let cli = Cli::parse_from(["guru-sdk", "sync"]);
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert!(!config.no_progress);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["guru-sdk", "-v", "-q", "sync"]).is_err());
    }
}
