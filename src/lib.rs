//! GuruSDK CLI - publish, sync and install versioned Unity SDK bundles.
//!
//! The GuruSDK is a set of Unity UPM packages developed in one repository
//! (the dev repository) and published as immutable per-version snapshots
//! into another (the library repository). Consumer Unity projects never see
//! either repository directly: they install from a local clone of the
//! library repository via symlinks into their `Packages/` directory.
//!
//! # Architecture Overview
//!
//! Three trees, one direction of flow:
//! - the **source workspace** (a dev repository checkout) holds the package
//!   sources, the version manifest `sdk-config.json` and the Unity lock
//!   file `packages-lock.json`
//! - the **artifact store** (a library repository checkout) accumulates one
//!   immutable directory per published version plus the `version_list.json`
//!   catalog
//! - the **local cache** (`~/.guru/unity/guru-sdk`) is a shallow clone of
//!   the library repository from which versions are linked into projects
//!
//! Publishing assembles a snapshot from local package trees and pinned git
//! dependencies, stages it under a temporary name and promotes it with one
//! atomic rename. Installing links a cached snapshot into a project and
//! rewrites the project's `Packages/manifest.json` to `file:` references.
//!
//! # Core Modules
//!
//! ## Publish pipeline
//! - [`workspace`] - layout of a dev repository checkout
//! - [`manifest`] - the `sdk-config.json` version manifest
//! - [`lockfile`] - Unity's `packages-lock.json` and its git dependencies
//! - [`snapshot`] - snapshot assembly: local copies, parallel pinned
//!   fetches, atomic promotion
//! - [`store`] - layout of the library repository and the publish commit
//! - [`index`] - the `version_list.json` catalog
//! - [`publish`] - the `publish` / `quick-publish` / `debug-source` flows
//!
//! ## Client flow
//! - [`cache`] - the local SDK cache and the sync-and-install composition
//! - [`version_check`] - remote catalog staleness oracle
//! - [`installer`] - symlinks, manifest rewrite and `.gitignore` upkeep
//!
//! ## Supporting modules
//! - [`cli`] - command-line interface
//! - [`config`] - resolved runtime configuration
//! - [`constants`] - repository URLs, well-known file names, tunables
//! - [`core`] - error types and the exit-code contract
//! - [`git`] - git operations via the system git command
//! - [`utils`] - filesystem, platform, progress and status-log helpers
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Re-clone the local SDK cache
//! guru-sdk sync
//!
//! # Install a published version into a Unity project
//! guru-sdk install --proj ./MyGame --version 1.4.0
//!
//! # Install the version pinned by the project's installer settings
//! guru-sdk unity-install --proj ./MyGame
//!
//! # Publish from CI
//! guru-sdk publish --branch release/1.4.0
//!
//! # Publish from a local dev checkout
//! guru-sdk quick-publish --proj ./sdk-dev/GuruSDKDev
//! ```

// Publish pipeline
pub mod index;
pub mod lockfile;
pub mod manifest;
pub mod publish;
pub mod snapshot;
pub mod store;
pub mod workspace;

// Client flow
pub mod cache;
pub mod installer;
pub mod version_check;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
