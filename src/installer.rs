//! Wiring a cached version snapshot into a consumer Unity project
//!
//! Installation never copies package content. For every package the snapshot
//! provides, the installer creates a symbolic link `Packages/.upm.<pkg>`
//! pointing into the local SDK cache and records
//! `"<pkg>": "file:.upm.<pkg>"` in the project's `Packages/manifest.json`,
//! so Unity resolves the package through the link. Links owned by a previous
//! install (anything with the `.upm.` prefix) are removed first.
//!
//! The installer also maintains a `.gitignore` block in the project so the
//! generated links never get committed while the three descriptor files
//! under `Packages/` still do.

use crate::constants::{
    INSTALLER_SETTINGS_JSON, SDK_CONFIG_JSON, UNITY_MANIFEST_JSON, UNITY_PACKAGES_ROOT, UPM_PREFIX,
};
use crate::core::SdkError;
use crate::manifest::SdkManifest;
use crate::utils::fs::{read_json_file, read_text_file, write_json_file, write_text_file};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// `ProjectSettings/guru-sdk-installer.json`, written by the Unity editor
/// plugin to pin which SDK version a project wants.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallerSettings {
    /// The SDK version this project installs.
    pub install_version: String,
}

impl InstallerSettings {
    /// Reads the installer settings from a Unity project.
    ///
    /// # Errors
    ///
    /// [`SdkError::PathNotFound`] when the settings file is absent.
    pub fn load(project: &Path) -> Result<Self> {
        let path = project.join("ProjectSettings").join(INSTALLER_SETTINGS_JSON);
        if !path.exists() {
            return Err(SdkError::PathNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        read_json_file(&path)
    }
}

/// Links one version snapshot into a Unity project and rewrites its UPM
/// manifest.
///
/// A package listed in the snapshot manifest but missing from the snapshot
/// directory is skipped with a log line (same best-effort policy as the
/// publish side).
///
/// # Errors
///
/// - [`SdkError::ConfigMissing`] when the snapshot has no `sdk-config.json`
/// - [`SdkError::PathNotFound`] when the project has no `Packages/` dir
pub fn install_snapshot(snapshot_dir: &Path, project: &Path) -> Result<()> {
    let sdk_config = snapshot_dir.join(SDK_CONFIG_JSON);
    if !sdk_config.exists() {
        return Err(SdkError::ConfigMissing {
            path: sdk_config.display().to_string(),
        }
        .into());
    }

    let packages_root = project.join(UNITY_PACKAGES_ROOT);
    clean_stale_links(&packages_root)?;

    let manifest_path = packages_root.join(UNITY_MANIFEST_JSON);
    let mut unity_manifest: serde_json::Value = read_json_file(&manifest_path)?;
    let dependencies = unity_manifest
        .as_object_mut()
        .and_then(|m| {
            m.entry("dependencies")
                .or_insert_with(|| serde_json::Value::Object(Default::default()))
                .as_object_mut()
        })
        .context("manifest.json has a non-object \"dependencies\" field")?;

    let snapshot_manifest = SdkManifest::load(&sdk_config)?;
    for package in &snapshot_manifest.packages {
        let in_path = snapshot_dir.join(package);
        if !in_path.exists() {
            info!("package [{package}] not found, skip install...");
            continue;
        }

        let link_path = packages_root.join(format!("{UPM_PREFIX}{package}"));
        make_symlink(&in_path, &link_path)?;
        dependencies.insert(
            package.clone(),
            serde_json::Value::String(format!("file:{UPM_PREFIX}{package}")),
        );
        debug!("linked {package} -> {}", in_path.display());
    }

    write_json_file(&manifest_path, &unity_manifest, true)?;
    update_gitignore(project)?;

    info!("installed {} into {}", snapshot_dir.display(), project.display());
    Ok(())
}

/// Removes every `.upm.*` entry under the project's `Packages/` directory.
fn clean_stale_links(packages_root: &Path) -> Result<()> {
    if !packages_root.exists() {
        return Err(SdkError::PathNotFound {
            path: packages_root.display().to_string(),
        }
        .into());
    }

    for entry in std::fs::read_dir(packages_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(UPM_PREFIX) {
            continue;
        }

        let path = entry.path();
        let meta = std::fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            // Symlinks (and stray files) are removed as files.
            std::fs::remove_file(&path)?;
        }
        debug!("removed stale link {}", path.display());
    }
    Ok(())
}

/// Creates (or replaces) a symbolic link at `link_path` pointing at
/// `target`.
fn make_symlink(target: &Path, link_path: &Path) -> Result<()> {
    if std::fs::symlink_metadata(link_path).is_ok() {
        std::fs::remove_file(link_path)
            .or_else(|_| std::fs::remove_dir_all(link_path))
            .with_context(|| format!("Failed to remove old link: {}", link_path.display()))?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link_path).with_context(|| {
        format!("Failed to link {} -> {}", link_path.display(), target.display())
    })?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(target, link_path).with_context(|| {
        format!("Failed to link {} -> {}", link_path.display(), target.display())
    })?;

    Ok(())
}

const GITIGNORE_COMMENT: &str = "# Guru UPM";

/// The ignore block keeps generated links out of version control while the
/// three descriptor files stay tracked.
fn gitignore_block() -> String {
    format!(
        "{GITIGNORE_COMMENT}\n\
         !Packages/manifest.json\n\
         !Packages/packages-lock.json\n\
         !Packages/sdk-config.json\n\
         Packages/*\n\n"
    )
}

/// Ensures the project `.gitignore` carries the current ignore block,
/// migrating away the legacy single-line form when present.
pub fn update_gitignore(project: &Path) -> Result<()> {
    let path = project.join(".gitignore");
    let legacy_block = format!("{GITIGNORE_COMMENT}\nPackages/{UPM_PREFIX}*");

    if !path.exists() {
        return write_text_file(&path, &gitignore_block());
    }

    let mut content = read_text_file(&path)?;
    if content.contains(GITIGNORE_COMMENT) {
        if !content.contains(&legacy_block) {
            // Current block already present.
            return Ok(());
        }
        content = content.replace(&legacy_block, "");
    }

    content.push('\n');
    content.push_str(&gitignore_block());
    write_text_file(&path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_installer_settings_load() {
        let temp = tempdir().unwrap();
        let settings_dir = temp.path().join("ProjectSettings");
        std::fs::create_dir_all(&settings_dir).unwrap();
        std::fs::write(
            settings_dir.join(INSTALLER_SETTINGS_JSON),
            r#"{"install_version": "1.2.0"}"#,
        )
        .unwrap();

        let settings = InstallerSettings::load(temp.path()).unwrap();
        assert_eq!(settings.install_version, "1.2.0");
    }

    #[test]
    fn test_installer_settings_missing_is_path_not_found() {
        let temp = tempdir().unwrap();
        let err = InstallerSettings::load(temp.path()).unwrap_err();
        let sdk = err.downcast_ref::<SdkError>().unwrap();
        assert_eq!(sdk.exit_code(), 405);
    }

    #[test]
    fn test_gitignore_created_when_absent() {
        let temp = tempdir().unwrap();
        update_gitignore(temp.path()).unwrap();
        let content = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.contains("# Guru UPM"));
        assert!(content.contains("!Packages/manifest.json"));
        assert!(content.contains("Packages/*"));
    }

    #[test]
    fn test_gitignore_unchanged_when_block_current() {
        let temp = tempdir().unwrap();
        update_gitignore(temp.path()).unwrap();
        let before = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        update_gitignore(temp.path()).unwrap();
        let after = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_gitignore_migrates_legacy_line() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".gitignore");
        std::fs::write(&path, "Library/\n# Guru UPM\nPackages/.upm.*\n").unwrap();

        update_gitignore(temp.path()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Library/"));
        assert!(!content.contains("Packages/.upm.*"));
        assert!(content.contains("!Packages/sdk-config.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_stale_links_removes_only_prefixed_entries() {
        let temp = tempdir().unwrap();
        let packages = temp.path().join("Packages");
        std::fs::create_dir_all(&packages).unwrap();
        std::fs::write(packages.join("manifest.json"), "{}").unwrap();
        std::fs::create_dir(packages.join(".upm.com.old")).unwrap();
        std::os::unix::fs::symlink("/nonexistent", packages.join(".upm.com.link")).unwrap();

        clean_stale_links(&packages).unwrap();
        assert!(packages.join("manifest.json").exists());
        assert!(!packages.join(".upm.com.old").exists());
        assert!(std::fs::symlink_metadata(packages.join(".upm.com.link")).is_err());
    }

    #[test]
    fn test_clean_stale_links_missing_root_fails() {
        let temp = tempdir().unwrap();
        let err = clean_stale_links(&temp.path().join("Packages")).unwrap_err();
        assert_eq!(err.downcast_ref::<SdkError>().unwrap().exit_code(), 405);
    }
}
