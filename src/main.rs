//! GuruSDK CLI entry point.
//!
//! Parses the command line, runs the requested subcommand and converts any
//! failure into the exit code consumed by the Unity editor integration and
//! CI pipelines:
//! - `sync` - delete and re-clone the local SDK cache
//! - `install` / `unity-install` - link a published version into a project
//! - `publish` / `quick-publish` - build and push a new version snapshot
//! - `debug-source` - build a snapshot without publishing

use anyhow::Result;
use clap::Parser;
use guru_sdk_cli::cli;
use guru_sdk_cli::core::error::{SdkError, user_friendly_error};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Exit codes are contractual; callers branch on them.
            let code = e.downcast_ref::<SdkError>().map_or(1, SdkError::exit_code);
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(code);
        }
    }
}
