//! Machine-readable status marker for CI and editor integrations
//!
//! Every top-level command writes its outcome into a `log.txt` file in the
//! invocation directory: `success: <message>` or `failed: <message>`. Build
//! agents and the Unity editor plugin poll this file instead of scraping
//! process output.

use crate::constants::STATUS_LOG_FILE;
use crate::utils::fs::write_text_file;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Writer for the single-line `log.txt` outcome marker.
#[derive(Debug, Clone)]
pub struct StatusLog {
    path: PathBuf,
}

impl StatusLog {
    /// Status log rooted in the given directory.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(STATUS_LOG_FILE),
        }
    }

    /// Status log rooted in the process working directory.
    ///
    /// # Errors
    ///
    /// Fails if the working directory cannot be determined.
    pub fn for_current_dir() -> Result<Self> {
        Ok(Self::in_dir(&std::env::current_dir()?))
    }

    /// Path of the marker file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes any marker left over from a previous run.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Records a successful outcome, replacing any previous marker.
    pub fn success(&self, message: &str) -> Result<()> {
        write_text_file(&self.path, &format!("success: {}", placeholder(message)))
    }

    /// Records a failed outcome, replacing any previous marker.
    pub fn failed(&self, message: &str) -> Result<()> {
        write_text_file(&self.path, &format!("failed: {}", placeholder(message)))
    }
}

fn placeholder(message: &str) -> &str {
    if message.trim().is_empty() {
        "..."
    } else {
        message
    }
}
