//! Integration tests for the guru-sdk binary's argument handling and exit
//! codes
//!
//! The exit codes are contractual: the Unity editor integration and CI
//! scripts branch on them, so they are asserted here against the real
//! binary.

mod common;

use assert_cmd::Command;
use common::UnityProjectFixture;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn guru_sdk(work_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("guru-sdk").unwrap();
    cmd.current_dir(work_dir)
        .env("GURU_SDK_HOME", work_dir.join("sdk-home"))
        .env("GURU_SDK_LIB_REPO", "file:///nonexistent/lib-repo")
        .env("GURU_SDK_VERSION_LIST_URL", "http://127.0.0.1:1/version_list.json")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("quick-publish"))
        .stdout(predicate::str::contains("debug-source"));
}

#[test]
fn test_install_missing_project_exits_100() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path())
        .args(["install", "--proj", "./no-such-project", "--version", "1.0.0"])
        .assert()
        .code(100)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_install_empty_version_exits_101() {
    let temp = TempDir::new().unwrap();
    let project = UnityProjectFixture::create(temp.path().join("MyGame")).unwrap();

    guru_sdk(temp.path())
        .args(["install", "--proj"])
        .arg(&project.root)
        .args(["--version", ""])
        .assert()
        .code(101);
}

#[test]
fn test_unity_install_without_settings_exits_405() {
    let temp = TempDir::new().unwrap();
    let project = UnityProjectFixture::create(temp.path().join("MyGame")).unwrap();

    guru_sdk(temp.path())
        .args(["unity-install", "--proj"])
        .arg(&project.root)
        .assert()
        .code(405);
}

#[test]
fn test_quick_publish_without_proj_exits_102() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path()).arg("quick-publish").assert().code(102);
}

#[test]
fn test_quick_publish_empty_proj_exits_102() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path())
        .args(["quick-publish", "--proj", "  "])
        .assert()
        .code(102);
}

#[test]
fn test_publish_zero_parallelism_exits_501() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path())
        .args(["publish", "--max-parallel", "0"])
        .assert()
        .code(501);
}

#[test]
fn test_sync_failure_writes_status_log() {
    let temp = TempDir::new().unwrap();
    // The lib repo env points at a nonexistent path, so sync must fail.
    guru_sdk(temp.path()).arg("sync").assert().failure();

    let log = fs::read_to_string(temp.path().join("log.txt")).unwrap();
    assert!(log.starts_with("failed:"), "unexpected log.txt content: {log}");
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let temp = TempDir::new().unwrap();
    guru_sdk(temp.path())
        .args(["--verbose", "--quiet", "sync"])
        .assert()
        .failure()
        .code(2);
}
