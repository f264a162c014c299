//! Resolved runtime configuration for the GuruSDK CLI.
//!
//! The original tool computed the SDK cache location lazily into a global
//! variable; here everything path- or URL-shaped is resolved exactly once at
//! process start into a [`Config`] value and passed explicitly to whatever
//! needs it. Environment variables override the built-in defaults so tests
//! and alternative deployments can redirect the tool without code changes:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `GURU_SDK_HOME` | local SDK cache directory |
//! | `GURU_SDK_LIB_REPO` | published library repository URL |
//! | `GURU_SDK_DEV_REPO` | development repository URL |
//! | `GURU_SDK_VERSION_LIST_URL` | remote version catalog URL |

use crate::constants::{
    SDK_DEV_REPO, SDK_HOME_RELATIVE, SDK_LIB_REPO, SDK_TEMP_RELATIVE, VERSION_LIST_URL,
    default_max_parallel,
};
use crate::utils::platform::{get_home_dir, resolve_path};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Immutable configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local cache of the published library repository
    /// (`~/.guru/unity/guru-sdk` by default).
    pub sdk_home: PathBuf,
    /// Scratch directory for quick-publish output clones.
    pub temp_dir: PathBuf,
    /// URL of the published library repository (the artifact store).
    pub lib_repo: String,
    /// URL of the development repository (the source workspace).
    pub dev_repo: String,
    /// HTTP(S) URL of the published `version_list.json`.
    pub version_list_url: String,
    /// Bound on concurrent external package fetches during a publish.
    pub max_parallel: usize,
}

impl Config {
    /// Resolves the configuration from defaults and environment overrides.
    ///
    /// # Errors
    ///
    /// Fails if the home directory cannot be determined or an override path
    /// does not expand cleanly.
    pub fn resolve() -> Result<Self> {
        let sdk_home = match std::env::var("GURU_SDK_HOME") {
            Ok(value) if !value.trim().is_empty() => resolve_path(&value)?,
            _ => get_home_dir()?.join(SDK_HOME_RELATIVE),
        };

        Ok(Self {
            sdk_home,
            temp_dir: get_home_dir()?.join(SDK_TEMP_RELATIVE),
            lib_repo: env_or("GURU_SDK_LIB_REPO", SDK_LIB_REPO),
            dev_repo: env_or("GURU_SDK_DEV_REPO", SDK_DEV_REPO),
            version_list_url: env_or("GURU_SDK_VERSION_LIST_URL", VERSION_LIST_URL),
            max_parallel: default_max_parallel(),
        })
    }

    /// Replaces the SDK cache directory, e.g. from the `--sdk-home` flag.
    #[must_use]
    pub fn with_sdk_home(mut self, path: &Path) -> Self {
        self.sdk_home = path.to_path_buf();
        self
    }

    /// Replaces the fetch parallelism bound, e.g. from `--max-parallel`.
    #[must_use]
    pub const fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_resolve_defaults() {
        unsafe {
            std::env::remove_var("GURU_SDK_HOME");
            std::env::remove_var("GURU_SDK_LIB_REPO");
        }
        let config = Config::resolve().unwrap();
        assert!(config.sdk_home.ends_with(SDK_HOME_RELATIVE));
        assert_eq!(config.lib_repo, SDK_LIB_REPO);
        assert_eq!(config.version_list_url, VERSION_LIST_URL);
        assert!(config.max_parallel >= 1);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("GURU_SDK_HOME", "/tmp/guru-test-home");
            std::env::set_var("GURU_SDK_LIB_REPO", "file:///tmp/lib-repo");
        }
        let config = Config::resolve().unwrap();
        assert_eq!(config.sdk_home, PathBuf::from("/tmp/guru-test-home"));
        assert_eq!(config.lib_repo, "file:///tmp/lib-repo");
        unsafe {
            std::env::remove_var("GURU_SDK_HOME");
            std::env::remove_var("GURU_SDK_LIB_REPO");
        }
    }

    #[test]
    #[serial]
    fn test_empty_env_override_falls_back() {
        unsafe {
            std::env::set_var("GURU_SDK_DEV_REPO", "  ");
        }
        let config = Config::resolve().unwrap();
        assert_eq!(config.dev_repo, SDK_DEV_REPO);
        unsafe {
            std::env::remove_var("GURU_SDK_DEV_REPO");
        }
    }

    #[test]
    fn test_builders() {
        let config = Config {
            sdk_home: PathBuf::from("/a"),
            temp_dir: PathBuf::from("/b"),
            lib_repo: String::new(),
            dev_repo: String::new(),
            version_list_url: String::new(),
            max_parallel: 4,
        };
        let config = config.with_sdk_home(Path::new("/c")).with_max_parallel(2);
        assert_eq!(config.sdk_home, PathBuf::from("/c"));
        assert_eq!(config.max_parallel, 2);
    }
}
