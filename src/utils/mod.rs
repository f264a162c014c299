//! Cross-platform utilities and helpers
//!
//! Shared plumbing for the publish and install pipelines: file system
//! operations with atomic writes, platform-specific path resolution, retry
//! backoff, progress indicators, and the `log.txt` status marker consumed by
//! the Unity editor integration.
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and safe copying
//! - [`platform`] - Platform-specific helpers and path resolution
//! - [`backoff`] - Exponential backoff for retried external fetches
//! - [`progress`] - Progress bars and spinners for long-running operations
//! - [`status`] - The `log.txt` success/failed outcome marker

pub mod backoff;
pub mod fs;
pub mod platform;
pub mod progress;
pub mod status;

pub use fs::{atomic_write, copy_dir, ensure_dir, remove_dir_all, safe_write};
pub use platform::{get_git_command, get_home_dir, is_windows, resolve_path};
pub use progress::ProgressBar;
pub use status::StatusLog;
