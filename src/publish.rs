//! Publish orchestration: from repositories to a pushed version snapshot
//!
//! Three entry points share one pipeline:
//!
//! - [`publish_from_branch`] - the CI flow: clone the dev repository at a
//!   branch and the library repository into clean work directories, build
//!   the snapshot, update the version catalog, commit and push.
//! - [`quick_publish`] - the developer flow: the source workspace is the
//!   checkout containing the local dev Unity project; the library
//!   repository is cloned into a scratch directory and removed afterwards.
//! - [`debug_source`] - clone both repositories and run the snapshot build
//!   only; nothing is registered or pushed.

use crate::config::Config;
use crate::core::SdkError;
use crate::git::GitRepo;
use crate::index::VersionIndex;
use crate::snapshot::SnapshotBuilder;
use crate::store::ArtifactStore;
use crate::utils::fs::{ensure_dir, remove_dir_all};
use crate::workspace::SourceWorkspace;
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

/// CI publish: clean work dirs under `work_dir`, clone both repositories,
/// build, register, push. Returns the published version id.
pub async fn publish_from_branch(config: &Config, work_dir: &Path, branch: &str) -> Result<String> {
    let workspace = clone_source(config, &work_dir.join("source"), branch).await?;
    let store = clone_output(config, &work_dir.join("output")).await?;

    let version = build_and_register(config, &workspace, &store).await?;
    store.commit_and_push(&version).await?;

    info!("===== Publish is done! =====");
    Ok(version)
}

/// Developer publish from a local dev Unity project. The source workspace
/// is the project's parent checkout; the library repository is cloned into
/// the scratch area and cleaned up afterwards.
pub async fn quick_publish(config: &Config, unity_proj: &Path) -> Result<String> {
    let source_root = unity_proj.parent().ok_or_else(|| SdkError::WrongSourcePath {
        path: unity_proj.display().to_string(),
    })?;
    let workspace = SourceWorkspace::new(source_root);

    let output_dir = config.temp_dir.join("output");
    let store = clone_output(config, &output_dir).await?;

    let result = async {
        let version = build_and_register(config, &workspace, &store).await?;
        store.commit_and_push(&version).await?;
        Ok::<_, anyhow::Error>(version)
    }
    .await;

    // Scratch clone is removed on success and failure alike; a cleanup
    // failure must not displace the publish outcome.
    if let Err(e) = remove_dir_all(&output_dir) {
        warn!("failed to remove scratch clone {}: {e}", output_dir.display());
    }

    let version = result?;
    info!("===== Publish is done! =====");
    Ok(version)
}

/// Debug flow: clone both repositories and build the snapshot, but leave
/// the version catalog untouched and push nothing.
pub async fn debug_source(config: &Config, work_dir: &Path, branch: &str) -> Result<String> {
    let workspace = clone_source(config, &work_dir.join("source"), branch).await?;
    let store = clone_output(config, &work_dir.join("output")).await?;

    let builder = SnapshotBuilder::new(&workspace, &store, config.max_parallel);
    let (version, _) = builder.build().await?;
    info!("debug build of version {version} complete (not registered)");
    Ok(version)
}

/// Clones the dev repository at `branch` into a clean `dest` and resolves
/// its submodules.
async fn clone_source(config: &Config, dest: &Path, branch: &str) -> Result<SourceWorkspace> {
    let branch = if branch.trim().is_empty() { "main" } else { branch };
    info!("pulling {} at branch {branch}", config.dev_repo);

    remove_dir_all(dest)?;
    ensure_dir(dest)?;
    let repo = GitRepo::clone_branch(&config.dev_repo, branch, dest).await?;
    repo.update_submodules().await?;

    Ok(SourceWorkspace::new(dest))
}

/// Clones the library repository into a clean `dest` with full history so
/// the publish commit can be pushed.
async fn clone_output(config: &Config, dest: &Path) -> Result<ArtifactStore> {
    info!("cloning {} into {}", config.lib_repo, dest.display());

    remove_dir_all(dest)?;
    ensure_dir(dest)?;
    GitRepo::clone_full(&config.lib_repo, dest).await?;

    Ok(ArtifactStore::new(dest))
}

/// Shared pipeline core: build the snapshot, then record it in the version
/// catalog. The catalog write happens only after the snapshot was promoted.
async fn build_and_register(
    config: &Config,
    workspace: &SourceWorkspace,
    store: &ArtifactStore,
) -> Result<String> {
    let builder = SnapshotBuilder::new(workspace, store, config.max_parallel);
    let (version, manifest) = builder.build().await?;

    let mut index = VersionIndex::load(store.root())?;
    index.record(&version, &manifest.desc);
    index.save(store.root())?;

    Ok(version)
}
