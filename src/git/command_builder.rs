//! Type-safe Git command builder for consistent command execution
//!
//! This module provides a fluent API for building and executing Git commands,
//! eliminating duplication and ensuring consistent error handling across the
//! publish and sync pipelines. Every external git invocation in the codebase
//! goes through [`GitCommand`], which applies a per-operation timeout and maps
//! failures onto the typed [`SdkError`] variants.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{
    GIT_CLONE_TIMEOUT, GIT_COMMAND_TIMEOUT, GIT_PUSH_TIMEOUT, GIT_SUBMODULE_TIMEOUT,
};
use crate::core::SdkError;
use crate::utils::platform::get_git_command;

/// Builder for constructing and executing Git subprocess commands.
///
/// Commands run via the system `git` binary (the same approach Cargo takes
/// with `git-fetch-with-cli`), so SSH agents, credential helpers and user
/// Git configuration all work without any handling on our side.
///
/// # Examples
///
/// ```rust,ignore
/// use guru_sdk_cli::git::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// GitCommand::clone_shallow("git@github.com:castbox/unity-gurusdk-library.git", "/tmp/lib")
///     .with_context("sync")
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct GitCommand {
    /// Arguments passed to git (e.g. `["clone", url, path]`)
    args: Vec<String>,

    /// Working directory, passed via `git -C` so the process cwd is untouched
    current_dir: Option<std::path::PathBuf>,

    /// Environment variables to set for the git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages (typically a package id)
    context: Option<String>,

    /// For clone commands, the URL for better error messages
    clone_url: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(GIT_COMMAND_TIMEOUT),
            context: None,
            clone_url: None,
        }
    }
}

impl GitCommand {
    /// Creates a new git command builder with the default short timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for the command.
    ///
    /// The directory is passed with `git -C`, making the operation
    /// independent of the process's own working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for the git process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Overrides the timeout (`None` disables it).
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Sets a context identifier included in log messages.
    ///
    /// Useful to tell concurrent operations apart when several packages are
    /// fetched in parallel.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Executes the command and returns its captured output.
    ///
    /// # Errors
    ///
    /// - [`SdkError::GitTimeout`] when the configured timeout elapses
    /// - [`SdkError::GitCloneFailed`] / [`SdkError::GitCheckoutFailed`] /
    ///   [`SdkError::GitCommandError`] on a non-zero exit status
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let mut cmd = Command::new(git_command);

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            // Use the path as-is to avoid symlink resolution issues on macOS
            // (e.g., /var vs /private/var)
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.clone());

        cmd.args(&full_args);

        if let Some(ref ctx) = self.context {
            tracing::debug!(target: "git", "({}) Executing command: {} {}", ctx, git_command, full_args.join(" "));
        } else {
            tracing::debug!(target: "git", "Executing command: {} {}", git_command, full_args.join(" "));
        }

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result
                    .context(format!("Failed to execute git {}", full_args.join(" ")))?,
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(SdkError::GitTimeout {
                        operation: self.operation_name(&full_args),
                        seconds: duration.as_secs(),
                    }
                    .into());
                }
            }
        } else {
            output_future
                .await
                .context(format!("Failed to execute git {}", full_args.join(" ")))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            tracing::debug!(target: "git", "Command failed with exit code: {:?}", output.status.code());
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "Error: {}", stderr);
            }

            let operation = self.operation_name(&full_args);
            let error = match operation.as_str() {
                "clone" => SdkError::GitCloneFailed {
                    url: self.clone_url.unwrap_or_else(|| "unknown".to_string()),
                    reason: stderr.to_string(),
                },
                "checkout" => {
                    let args_start = usize::from(full_args.first().map(String::as_str) == Some("-C")) * 2;
                    SdkError::GitCheckoutFailed {
                        reference: full_args.get(args_start + 1).cloned().unwrap_or_default(),
                        reason: stderr.to_string(),
                    }
                }
                _ => SdkError::GitCommandError {
                    operation,
                    stderr: if stderr.is_empty() {
                        stdout.to_string()
                    } else {
                        stderr.to_string()
                    },
                },
            };

            return Err(error.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.is_empty() {
            tracing::debug!(target: "git", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "git::perf",
                "Git {} took {:.2}s",
                self.operation_name(&full_args),
                elapsed.as_secs_f64()
            );
        }

        Ok(GitCommandOutput { stdout, stderr })
    }

    /// Executes the command and returns only trimmed stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Executes the command, checking only for success.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }

    /// The git verb being executed, skipping a leading `-C <dir>` pair.
    fn operation_name(&self, full_args: &[String]) -> String {
        let args_start = if full_args.first().map(String::as_str) == Some("-C") && full_args.len() > 2
        {
            2
        } else {
            0
        };
        full_args
            .get(args_start)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Output from a git command.
#[derive(Debug)]
pub struct GitCommandOutput {
    /// Standard output from the git command
    pub stdout: String,
    /// Standard error output from the git command
    pub stderr: String,
}

// Convenience builders for the operations the pipelines actually perform.

impl GitCommand {
    /// `git clone --depth 1 <url> <target>` - shallow clone for package
    /// pinning and cache mirroring.
    #[must_use]
    pub fn clone_shallow(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "clone",
            "--depth",
            "1",
            url,
            &target.as_ref().display().to_string(),
        ]);
        cmd.clone_url = Some(url.to_string());
        cmd.timeout_duration = Some(GIT_CLONE_TIMEOUT);
        cmd
    }

    /// `git clone -b <branch> --depth=1 <url> <target>` - shallow clone of a
    /// specific branch, used for the dev repository during a publish.
    #[must_use]
    pub fn clone_branch(url: &str, branch: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "clone",
            "-b",
            branch,
            "--depth=1",
            url,
            &target.as_ref().display().to_string(),
        ]);
        cmd.clone_url = Some(url.to_string());
        cmd.timeout_duration = Some(GIT_CLONE_TIMEOUT);
        cmd
    }

    /// `git clone <url> <target>` - full clone, used for the library
    /// repository that must be committed to and pushed.
    #[must_use]
    pub fn clone_full(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd =
            Self::new().args(["clone", url, &target.as_ref().display().to_string()]);
        cmd.clone_url = Some(url.to_string());
        cmd.timeout_duration = Some(GIT_CLONE_TIMEOUT);
        cmd
    }

    /// `git checkout <ref>` - pin a clone to an exact commit.
    #[must_use]
    pub fn checkout(ref_name: &str) -> Self {
        Self::new().args(["checkout", ref_name])
    }

    /// `git submodule update --init --recursive` - populate locally-vendored
    /// package directories in the source workspace.
    #[must_use]
    pub fn submodule_update() -> Self {
        Self::new()
            .args(["submodule", "update", "--init", "--recursive"])
            .with_timeout(Some(GIT_SUBMODULE_TIMEOUT))
    }

    /// `git add <pathspec>`.
    #[must_use]
    pub fn add(pathspec: &str) -> Self {
        Self::new().args(["add", pathspec])
    }

    /// `git commit -m <message>`.
    #[must_use]
    pub fn commit(message: &str) -> Self {
        Self::new().args(["commit", "-m", message])
    }

    /// `git push`.
    #[must_use]
    pub fn push() -> Self {
        Self::new().arg("push").with_timeout(Some(GIT_PUSH_TIMEOUT))
    }

    /// `git rev-parse HEAD` - current commit hash.
    #[must_use]
    pub fn current_commit() -> Self {
        Self::new().args(["rev-parse", "HEAD"])
    }
}
