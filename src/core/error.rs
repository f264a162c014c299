//! Error handling for the GuruSDK CLI.
//!
//! The error system is built around two types:
//! - [`SdkError`] - strongly-typed failure cases for everything the tool does
//! - [`ErrorContext`] - wrapper that adds user-friendly suggestions and details
//!
//! Every fatal condition carries a numeric process exit code via
//! [`SdkError::exit_code`]. The codes are part of the tool's contract with the
//! Unity editor integration and CI jobs that drive it, so they are stable:
//!
//! | code | condition |
//! |------|-----------|
//! | 100  | Unity project directory not found |
//! | 101  | empty or invalid requested version |
//! | 102  | bad quick-publish source path |
//! | 103  | `sdk-config.json` not found |
//! | 104  | `sdk-config.json` present but unparsable or invalid |
//! | 105  | `packages-lock.json` not found |
//! | 106  | external package fetch failed after retries |
//! | 405  | a referenced path does not exist on disk |
//! | 501  | malformed command-line arguments |
//! | 1    | anything else (git, io, network, json) |
//!
//! Use [`user_friendly_error`] at the CLI boundary to convert any
//! [`anyhow::Error`] into a displayable context with suggestions.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for GuruSDK CLI operations.
///
/// Each variant represents a specific failure mode and carries the context
/// needed to explain it to the user. Variants that correspond to the stable
/// exit-code contract are documented with their code.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Git operation failed during execution.
    ///
    /// Raised when a git command returns a non-zero exit code. Common causes
    /// include network issues, authentication problems, or invalid repository
    /// states.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g., "clone", "checkout", "push")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// Git executable not found in PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Git repository clone failed.
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// The repository URL that failed to clone
        url: String,
        /// The reason for the clone failure
        reason: String,
    },

    /// Git checkout failed.
    #[error("Failed to checkout reference '{reference}' in repository")]
    GitCheckoutFailed {
        /// The git reference (branch, tag, or commit) that failed to checkout
        reference: String,
        /// The reason for the checkout failure
        reason: String,
    },

    /// A git operation exceeded its timeout. Exit code 1.
    #[error("Git operation timed out after {seconds}s: {operation}")]
    GitTimeout {
        /// The git operation that timed out
        operation: String,
        /// The configured timeout in seconds
        seconds: u64,
    },

    /// Unity project directory does not exist. Exit code 100.
    #[error("Unity project not found at {path}")]
    ProjectNotFound {
        /// The path that was expected to contain a Unity project
        path: String,
    },

    /// The requested SDK version is empty or malformed. Exit code 101.
    #[error("Invalid SDK version '{version}'")]
    WrongVersion {
        /// The offending version string
        version: String,
    },

    /// The quick-publish source path is empty or unusable. Exit code 102.
    #[error("Invalid source path '{path}'")]
    WrongSourcePath {
        /// The offending path string
        path: String,
    },

    /// `sdk-config.json` is missing. Exit code 103.
    ///
    /// The manifest is required both to publish (it names the release) and to
    /// install (it lists the packages to link).
    #[error("sdk-config.json not found at {path}")]
    ConfigMissing {
        /// Where the manifest was expected
        path: String,
    },

    /// `sdk-config.json` exists but could not be parsed or fails validation.
    /// Exit code 104.
    #[error("Invalid sdk-config.json in {file}: {reason}")]
    ConfigParseError {
        /// Path to the manifest that failed to parse
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// `packages-lock.json` is missing. Exit code 105.
    #[error("packages-lock.json not found at {path}")]
    LockMissing {
        /// Where the lock file was expected
        path: String,
    },

    /// Lock file exists but could not be parsed. Exit code 104.
    #[error("Invalid packages-lock.json in {file}: {reason}")]
    LockParseError {
        /// Path to the lock file that failed to parse
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// An external package fetch failed after all retry attempts.
    /// Exit code 106.
    #[error("Failed to fetch package '{package}' from {url} after {attempts} attempts")]
    FetchFailed {
        /// The package identifier from the lock file
        package: String,
        /// The git URL that could not be fetched
        url: String,
        /// How many attempts were made before giving up
        attempts: u32,
    },

    /// A referenced project, snapshot, or version directory does not exist.
    /// Exit code 405.
    #[error("Path not found: {path}")]
    PathNotFound {
        /// The missing path
        path: String,
    },

    /// Malformed command-line arguments. Exit code 501.
    #[error("Invalid arguments: {reason}")]
    WrongArgs {
        /// What was wrong with the arguments
        reason: String,
    },

    /// Network error outside the staleness check (which absorbs its own).
    #[error("Network error: {operation}")]
    NetworkError {
        /// The network operation that failed
        operation: String,
        /// Reason for the network failure
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Other error.
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl SdkError {
    /// Process exit code for this error, per the stable contract above.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ProjectNotFound { .. } => 100,
            Self::WrongVersion { .. } => 101,
            Self::WrongSourcePath { .. } => 102,
            Self::ConfigMissing { .. } => 103,
            Self::ConfigParseError { .. } | Self::LockParseError { .. } => 104,
            Self::LockMissing { .. } => 105,
            Self::FetchFailed { .. } => 106,
            Self::PathNotFound { .. } => 405,
            Self::WrongArgs { .. } => 501,
            _ => 1,
        }
    }
}

impl Clone for SdkError {
    fn clone(&self) -> Self {
        match self {
            Self::GitCommandError { operation, stderr } => Self::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::GitNotFound => Self::GitNotFound,
            Self::GitCloneFailed { url, reason } => Self::GitCloneFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::GitCheckoutFailed { reference, reason } => Self::GitCheckoutFailed {
                reference: reference.clone(),
                reason: reason.clone(),
            },
            Self::GitTimeout { operation, seconds } => Self::GitTimeout {
                operation: operation.clone(),
                seconds: *seconds,
            },
            Self::ProjectNotFound { path } => Self::ProjectNotFound { path: path.clone() },
            Self::WrongVersion { version } => Self::WrongVersion {
                version: version.clone(),
            },
            Self::WrongSourcePath { path } => Self::WrongSourcePath { path: path.clone() },
            Self::ConfigMissing { path } => Self::ConfigMissing { path: path.clone() },
            Self::ConfigParseError { file, reason } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::LockMissing { path } => Self::LockMissing { path: path.clone() },
            Self::LockParseError { file, reason } => Self::LockParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::FetchFailed {
                package,
                url,
                attempts,
            } => Self::FetchFailed {
                package: package.clone(),
                url: url.clone(),
                attempts: *attempts,
            },
            Self::PathNotFound { path } => Self::PathNotFound { path: path.clone() },
            Self::WrongArgs { reason } => Self::WrongArgs {
                reason: reason.clone(),
            },
            Self::NetworkError { operation, reason } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            // Errors that don't implement Clone collapse to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::Other { message } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps an [`SdkError`] and adds optional suggestions and details. When
/// displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SdkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from an [`SdkError`].
    #[must_use]
    pub const fn new(error: SdkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions.
///
/// Recognizes [`SdkError`] variants and common [`std::io::Error`] kinds and
/// attaches appropriate guidance; everything else falls through with its full
/// error chain attached for diagnostics.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(sdk_error) = error.downcast_ref::<SdkError>() {
        return create_error_context(sdk_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(SdkError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion(
                    "Check file ownership, or re-run with elevated permissions",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(SdkError::PathNotFound {
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // the root cause is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(SdkError::Other { message })
}

/// Map each [`SdkError`] variant to a context with tailored suggestions.
fn create_error_context(error: SdkError) -> ErrorContext {
    match &error {
        SdkError::GitNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("The GuruSDK CLI drives git for every repository operation"),

        SdkError::GitCommandError { operation, .. } => {
            let suggestion = match operation.as_str() {
                op if op.contains("clone") => "Check the repository URL and your internet connection. Verify you have access to the repository",
                op if op.contains("checkout") => "Verify the pinned commit exists. The lock file may reference a commit that was force-pushed away",
                op if op.contains("push") => "Check that you have push access to the library repository and that your branch is up to date",
                op if op.contains("submodule") => "Check submodule URLs in .gitmodules and your access to each submodule repository",
                _ => "Check your git configuration and repository access. Try running the git command manually for more details",
            };
            ErrorContext::new(error.clone()).with_suggestion(suggestion)
        }

        SdkError::GitCloneFailed { url, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Verify the repository URL is correct: {url}. Check your internet connection and repository access"
            )),

        SdkError::FetchFailed { package, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check that the pinned URL and hash for '{package}' in packages-lock.json are still reachable, then re-run the publish"
            ))
            .with_details("External packages are retried with backoff before the publish gives up"),

        SdkError::ConfigMissing { path } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Create {path} in the dev project's Packages directory, or pass the right --proj / workspace path"
            )),

        SdkError::LockMissing { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Open the dev project in Unity once so it regenerates Packages/packages-lock.json"),

        SdkError::ConfigParseError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the JSON syntax in {file} and make sure it declares \"version\" and \"packages\""
            )),

        SdkError::ProjectNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Pass the Unity project directory (the one containing Packages/ and ProjectSettings/) via --proj"),

        SdkError::WrongVersion { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Pass a published version id via --version, e.g. --version 2.1.0"),

        SdkError::PathNotFound { path } => ErrorContext::new(error.clone())
            .with_details(format!("Expected {path} to exist; a sync may be required first")),

        _ => ErrorContext::new(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SdkError::GitNotFound;
        assert_eq!(error.to_string(), "Git is not installed or not found in PATH");

        let error = SdkError::ConfigMissing {
            path: "/tmp/Packages/sdk-config.json".to_string(),
        };
        assert_eq!(error.to_string(), "sdk-config.json not found at /tmp/Packages/sdk-config.json");

        let error = SdkError::FetchFailed {
            package: "com.example.pkg".to_string(),
            url: "https://example.com/pkg.git".to_string(),
            attempts: 3,
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch package 'com.example.pkg' from https://example.com/pkg.git after 3 attempts"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SdkError::ProjectNotFound { path: String::new() }.exit_code(), 100);
        assert_eq!(SdkError::WrongVersion { version: String::new() }.exit_code(), 101);
        assert_eq!(SdkError::WrongSourcePath { path: String::new() }.exit_code(), 102);
        assert_eq!(SdkError::ConfigMissing { path: String::new() }.exit_code(), 103);
        assert_eq!(
            SdkError::ConfigParseError {
                file: String::new(),
                reason: String::new()
            }
            .exit_code(),
            104
        );
        assert_eq!(SdkError::LockMissing { path: String::new() }.exit_code(), 105);
        assert_eq!(
            SdkError::FetchFailed {
                package: String::new(),
                url: String::new(),
                attempts: 3
            }
            .exit_code(),
            106
        );
        assert_eq!(SdkError::PathNotFound { path: String::new() }.exit_code(), 405);
        assert_eq!(SdkError::WrongArgs { reason: String::new() }.exit_code(), 501);
        assert_eq!(SdkError::GitNotFound.exit_code(), 1);
    }

    #[test]
    fn test_error_context() {
        let ctx = ErrorContext::new(SdkError::GitNotFound)
            .with_suggestion("Install git using your package manager")
            .with_details("Git is required for every repository operation");

        assert_eq!(ctx.suggestion, Some("Install git using your package manager".to_string()));
        assert_eq!(
            ctx.details,
            Some("Git is required for every repository operation".to_string())
        );
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(SdkError::GitNotFound).with_suggestion("Install git");

        let display = format!("{ctx}");
        assert!(display.contains("Git is not installed or not found in PATH"));
        assert!(display.contains("Install git"));
    }

    #[test]
    fn test_user_friendly_error_not_found() {
        use std::io::{Error, ErrorKind};

        let io_error = Error::new(ErrorKind::NotFound, "file not found");
        let anyhow_error = anyhow::Error::from(io_error);

        let ctx = user_friendly_error(anyhow_error);
        match ctx.error {
            SdkError::PathNotFound { .. } => {}
            _ => panic!("Expected PathNotFound"),
        }
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_sdk_error() {
        let error = SdkError::FetchFailed {
            package: "com.x.y".to_string(),
            url: "https://example.com/x.git".to_string(),
            attempts: 3,
        };
        let ctx = user_friendly_error(anyhow::Error::from(error));
        match ctx.error {
            SdkError::FetchFailed { attempts, .. } => assert_eq!(attempts, 3),
            _ => panic!("Expected FetchFailed"),
        }
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic() {
        let error = anyhow::anyhow!("Generic error");
        let ctx = user_friendly_error(error);

        match ctx.error {
            SdkError::Other { message } => {
                assert_eq!(message, "Generic error");
            }
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_error_chain_in_message() {
        let root = anyhow::anyhow!("root cause");
        let wrapped = root.context("outer context");
        let ctx = user_friendly_error(wrapped);

        match ctx.error {
            SdkError::Other { message } => {
                assert!(message.contains("outer context"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        use std::io::Error;

        let io_error = Error::other("test error");
        let sdk_error = SdkError::from(io_error);

        match sdk_error {
            SdkError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }

    #[test]
    fn test_error_clone_collapses_io() {
        let error = SdkError::IoError(std::io::Error::other("disk on fire"));
        let cloned = error.clone();
        match cloned {
            SdkError::Other { message } => assert!(message.contains("disk on fire")),
            _ => panic!("Expected Other after cloning IoError"),
        }
    }
}
