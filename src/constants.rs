//! Global constants used throughout the GuruSDK CLI codebase.
//!
//! This module contains the well-known file names and directory layout of the
//! SDK repositories, default remote URLs, timeout durations, and retry
//! parameters that are used across multiple modules. Defining them centrally
//! improves maintainability and makes magic numbers more discoverable.

use std::time::Duration;

/// Developer-authored package manifest inside the dev Unity project.
///
/// Declares the release version, a human description, and the list of
/// package identifiers that belong to the release.
pub const SDK_CONFIG_JSON: &str = "sdk-config.json";

/// Unity's machine-generated dependency lock file.
///
/// Every resolved dependency appears here; entries with `source == "git"`
/// carry the pinned commit hash used for exact reproduction.
pub const PACKAGES_LOCK_JSON: &str = "packages-lock.json";

/// Version catalog at the root of the published library repository.
pub const VERSION_LIST_JSON: &str = "version_list.json";

/// Unity's own UPM dependency manifest inside a consumer project.
pub const UNITY_MANIFEST_JSON: &str = "manifest.json";

/// Package root directory of a Unity project.
pub const UNITY_PACKAGES_ROOT: &str = "Packages";

/// Second-level directory of the Unity workspace inside the dev repository.
pub const UNITY_DEV_PROJECT: &str = "GuruSDKDev";

/// Installer settings file inside a consumer project's `ProjectSettings/`.
pub const INSTALLER_SETTINGS_JSON: &str = "guru-sdk-installer.json";

/// Merged library package tree inside the dev repository (`packages/` dir).
///
/// Every subdirectory of this tree is a locally-vendored package that gets
/// copied verbatim into a published version snapshot.
pub const SDK_LIB_COMBINED: &str = "com.guru.unity.sdk.v2";

/// Directory inside the dev repository that holds the merged library tree.
pub const WORKSPACE_PACKAGES_DIR: &str = "packages";

/// Prefix for symlinks the installer creates under a consumer project's
/// `Packages/` directory. Entries with this prefix are owned by the tool
/// and get cleaned up on every install.
pub const UPM_PREFIX: &str = ".upm.";

/// Location of the local SDK cache, relative to the user's home directory.
pub const SDK_HOME_RELATIVE: &str = ".guru/unity/guru-sdk";

/// Scratch area for quick-publish output clones, relative to the home dir.
pub const SDK_TEMP_RELATIVE: &str = ".guru/unity/temp";

/// Published SDK library repository (the artifact store).
pub const SDK_LIB_REPO: &str = "git@github.com:castbox/unity-gurusdk-library.git";

/// SDK development repository (the source workspace).
pub const SDK_DEV_REPO: &str = "git@github.com:castbox/unity-gurusdk-dev.git";

/// Raw URL of the published version catalog, used for staleness checks.
pub const VERSION_LIST_URL: &str =
    "https://raw.githubusercontent.com/castbox/unity-gurusdk-library/refs/heads/main/version_list.json";

/// Status marker file written next to the invocation for editor integration.
pub const STATUS_LOG_FILE: &str = "log.txt";

/// Placeholder description recorded when a manifest omits one.
pub const DEFAULT_DESCRIPTION: &str = "not set yet";

/// Maximum backoff delay for exponential backoff (500ms).
///
/// Exponential backoff delays are capped at this value to prevent
/// excessive wait times during retry operations.
pub const MAX_BACKOFF_DELAY_MS: u64 = 500;

/// Starting delay for exponential backoff (10ms).
///
/// This is the initial delay used in exponential backoff calculations,
/// which doubles on each retry attempt.
pub const STARTING_BACKOFF_DELAY_MS: u64 = 10;

/// Maximum attempts for a single external package fetch (clone + checkout).
///
/// After this many failed attempts the publish aborts with a fetch error
/// rather than retrying forever against a dead remote.
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Timeout for Git clone operations (120 seconds).
///
/// Clone operations may take longer than other commands, especially
/// for large repositories.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for Git submodule resolution (120 seconds).
///
/// Recursive submodule checkouts fetch many independent repositories
/// and are the slowest git step in a publish.
pub const GIT_SUBMODULE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for short Git operations such as checkout, add and commit
/// (60 seconds).
pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for Git push operations (120 seconds).
pub const GIT_PUSH_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for the version catalog HTTP fetch (30 seconds).
///
/// Matches the editor-side installer so both agree on when a remote is
/// considered unreachable.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum number of parallel package fetches regardless of CPU count.
///
/// This ensures reasonable parallelism even on single-core machines.
/// Package clones are I/O-bound, so a floor of 10 keeps throughput up.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
///
/// Higher values increase throughput but may strain resources or hit rate limits.
/// The value of 2 balances throughput with system stability.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default CPU core count when detection fails.
///
/// Used as a fallback when `std::thread::available_parallelism()` returns an error.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Default number of concurrent external package fetches.
pub fn default_max_parallel() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    MIN_PARALLELISM.max(cores * PARALLELISM_CORE_MULTIPLIER)
}
