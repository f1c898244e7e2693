//! CLI tests for gadmin
//!
//! This test suite covers:
//! - Argument parsing and help output
//! - Home directory validation and exit codes
//! - Cluster management through the binary
//! - Dry runs against a stand-in runner
//!
//! Commands that touch the home refuse to run as root, so those tests are
//! skipped when the suite itself runs as root.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

// Helper to get a command isolated from the caller's configuration
fn gadmin_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gadmin").unwrap();
    cmd.env("GADMIN_CONFIG", config_dir.join("absent.toml"))
        .env("NO_COLOR", "1")
        .env_remove("GADMIN_HOME")
        .env_remove("GADMIN_RUNNER")
        .env_remove("GADMIN_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

// Helper to create an executable stand-in for ansible-runner
fn fake_runner(dir: &Path) -> PathBuf {
    let script = dir.join("fake-runner");
    fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn home_with_cluster() -> TempDir {
    let home = tempdir().unwrap();
    gadmin_cmd(home.path())
        .args(["cluster", "create", "prod", "n1", "n2"])
        .env("GADMIN_HOME", home.path())
        .assert()
        .success();
    home
}

// ============================================================================
// Basic Arguments
// ============================================================================

#[test]
fn test_version() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gadmin"));
}

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_run_requires_playbook() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .args(["run", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PLAYBOOK"));
}

// ============================================================================
// Home Validation
// ============================================================================

#[test]
fn test_missing_home() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path()).arg("info").assert().code(254);
}

#[test]
fn test_relative_home() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .args(["--home", "relative/home", "info"])
        .assert()
        .code(254);
}

#[test]
fn test_home_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, "").unwrap();
    gadmin_cmd(dir.path())
        .arg("info")
        .env("GADMIN_HOME", &file)
        .assert()
        .code(254);
}

#[test]
fn test_runner_not_found() {
    if running_as_root() {
        return;
    }

    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .args(["run", "prod", "site.yml"])
        .env("GADMIN_HOME", dir.path())
        .env("GADMIN_RUNNER", dir.path().join("missing-runner"))
        .assert()
        .code(253);
}

#[test]
fn test_home_checked_before_runner() {
    let dir = tempdir().unwrap();
    gadmin_cmd(dir.path())
        .args(["run", "prod", "site.yml"])
        .env("GADMIN_RUNNER", dir.path().join("missing-runner"))
        .assert()
        .code(254);
}

// ============================================================================
// Clusters
// ============================================================================

#[test]
fn test_cluster_create_and_list() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    assert!(home.path().join("inventory/prod.yml").is_file());

    gadmin_cmd(home.path())
        .args(["--output", "json", "cluster", "list"])
        .env("GADMIN_HOME", home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"prod\""));

    gadmin_cmd(home.path())
        .arg("info")
        .env("GADMIN_HOME", home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("has 1 clusters defined."));
}

#[test]
fn test_cluster_create_duplicate() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    gadmin_cmd(home.path())
        .args(["cluster", "create", "prod", "n3"])
        .env("GADMIN_HOME", home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already in the inventory"));
}

#[test]
fn test_cluster_show_unknown() {
    if running_as_root() {
        return;
    }

    let home = tempdir().unwrap();
    gadmin_cmd(home.path())
        .args(["cluster", "show", "ghost"])
        .env("GADMIN_HOME", home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("isn't in the inventory"));
}

#[test]
fn test_hosts_resolution_json() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    let output = gadmin_cmd(home.path())
        .args(["--output", "json", "hosts", "prod", "-g", "gluster"])
        .env("GADMIN_HOME", home.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["n1"], serde_json::json!(["gluster"]));
    assert_eq!(resolved["n2"], serde_json::json!(["gluster"]));
}

#[test]
fn test_hosts_no_match() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    gadmin_cmd(home.path())
        .args(["hosts", "prod", "-g", "nonexistent"])
        .env("GADMIN_HOME", home.path())
        .assert()
        .code(5);
}

// ============================================================================
// Runs
// ============================================================================

#[test]
fn test_dry_run_prepares_workspace() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    let runner = fake_runner(home.path());
    let playbook = home.path().join("site.yml");
    fs::write(&playbook, "- hosts: all\n").unwrap();

    gadmin_cmd(home.path())
        .args(["run", "prod"])
        .arg(&playbook)
        .args(["--group", "gluster", "--ident", "dry-1", "--dry-run"])
        .env("GADMIN_HOME", home.path())
        .env("GADMIN_RUNNER", &runner)
        .assert()
        .success()
        .stdout(predicate::str::contains("--hosts n1,n2"));

    let base = home.path().join("runs/dry-1");
    assert!(base.join("inventory/site.yml").is_file());
    assert!(base.join("inventory/hosts.yml").is_file());
    assert!(base.join("project").is_dir());
}

#[test]
fn test_run_reports_runner_exit_code() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    let runner = home.path().join("failing-runner");
    fs::write(&runner, "#!/bin/sh\nexit 7\n").unwrap();
    fs::set_permissions(&runner, fs::Permissions::from_mode(0o755)).unwrap();
    let playbook = home.path().join("site.yml");
    fs::write(&playbook, "- hosts: all\n").unwrap();

    gadmin_cmd(home.path())
        .args(["run", "prod"])
        .arg(&playbook)
        .args(["--ident", "fail-1"])
        .env("GADMIN_HOME", home.path())
        .env("GADMIN_RUNNER", &runner)
        .assert()
        .code(7);
}

#[test]
fn test_run_reused_ident_fails() {
    if running_as_root() {
        return;
    }

    let home = home_with_cluster();
    let runner = fake_runner(home.path());
    let playbook = home.path().join("site.yml");
    fs::write(&playbook, "- hosts: all\n").unwrap();

    for expected in [0, 4] {
        gadmin_cmd(home.path())
            .args(["run", "prod"])
            .arg(&playbook)
            .args(["--ident", "same", "--dry-run"])
            .env("GADMIN_HOME", home.path())
            .env("GADMIN_RUNNER", &runner)
            .assert()
            .code(expected);
    }
}
