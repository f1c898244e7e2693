//! Integration tests for run orchestration
//!
//! These tests drive a [`RunOrchestrator`] against real temporary
//! directories and a stand-in runner script:
//! - Workspace creation happens at most once per base directory
//! - Playbooks and inventories are staged into the workspace
//! - A playbook never replaces the staged inventory
//! - Target overrides flow into the runner arguments
//! - Runner exit codes are reported back unchanged

use gadmin::inventory::{Cluster, HostGroupDocument, InventoryStore};
use gadmin::runner::{RunOrchestrator, RunState, RunnerConfig};
use gadmin::Error;
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Helper to write an executable stand-in for ansible-runner that records
// its arguments one per line and exits with `code`
fn fake_runner(dir: &Path, code: i32) -> (PathBuf, PathBuf) {
    let script = dir.join("fake-runner");
    let record = dir.join("runner-args.txt");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit {}\n",
            record.display(),
            code
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    (script, record)
}

fn write_playbook(dir: &Path) -> PathBuf {
    let playbook = dir.join("site.yml");
    fs::write(
        &playbook,
        "- hosts: gluster\n  tasks:\n    - ping:\n",
    )
    .unwrap();
    playbook
}

fn scenario_cluster() -> Cluster {
    let doc = HostGroupDocument::from_yaml(
        r#"all:
  hosts:
    h1: {}
    h2: {}
    h3: {}
  children:
    web:
      hosts:
        h1: {}
        h2: {}
    db:
      hosts:
        h2: {}
        h3: {}
"#,
    )
    .unwrap();
    Cluster::new("scenario", doc)
}

// ============================================================================
// Workspace
// ============================================================================

#[test]
fn test_prepare_workspace_once() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("run-1");
    let run = RunOrchestrator::new(&base, scenario_cluster(), RunnerConfig::default()).unwrap();

    run.prepare_workspace().unwrap();
    assert!(base.join("inventory").is_dir());
    assert!(base.join("project").is_dir());

    let err = run.prepare_workspace().unwrap_err();
    assert!(matches!(err, Error::WorkspaceExists { .. }));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_stage_playbook_copies_bytes() {
    let dir = TempDir::new().unwrap();
    let playbook = write_playbook(dir.path());
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();
    run.prepare_workspace().unwrap();

    let staged = run.stage_playbook(&playbook).unwrap().to_path_buf();
    assert_eq!(staged, dir.path().join("run/inventory/site.yml"));
    assert_eq!(fs::read(&staged).unwrap(), fs::read(&playbook).unwrap());
    assert_eq!(run.state(), RunState::PlaybookStaged);
}

#[test]
fn test_stage_missing_playbook() {
    let dir = TempDir::new().unwrap();
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();
    run.prepare_workspace().unwrap();

    let err = run.stage_playbook(dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, Error::SourceNotReadable { .. }));
    assert!(run.staged_playbook().is_none());
}

#[test]
fn test_stage_before_prepare_fails() {
    let dir = TempDir::new().unwrap();
    let playbook = write_playbook(dir.path());
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();

    assert!(matches!(
        run.stage_playbook(&playbook),
        Err(Error::WorkspaceNotWritable { .. })
    ));
}

#[test]
fn test_stage_inventory_writes_cluster() {
    let dir = TempDir::new().unwrap();
    let cluster = scenario_cluster();
    let run = RunOrchestrator::new(dir.path().join("run"), cluster.clone(), RunnerConfig::default())
        .unwrap();
    run.prepare_workspace().unwrap();

    let staged = run.stage_inventory().unwrap();
    assert_eq!(staged, dir.path().join("run/inventory/hosts.yml"));

    let written = HostGroupDocument::from_yaml(&fs::read_to_string(&staged).unwrap()).unwrap();
    assert_eq!(written, cluster.snapshot());
}

#[test]
fn test_playbook_named_hosts_yml_rejected() {
    let dir = TempDir::new().unwrap();
    let playbook = dir.path().join("hosts.yml");
    fs::write(&playbook, "- hosts: all\n").unwrap();
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();
    run.prepare_workspace().unwrap();

    let inventory = run.stage_inventory().unwrap();
    let before = fs::read(&inventory).unwrap();

    let err = run.stage_playbook(&playbook).unwrap_err();
    assert!(matches!(err, Error::StagingConflict(_)));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(fs::read(&inventory).unwrap(), before);
    assert!(run.staged_playbook().is_none());
}

// ============================================================================
// Targets and Invocation
// ============================================================================

#[test]
fn test_group_targets_follow_live_document() {
    let dir = TempDir::new().unwrap();
    let cluster = scenario_cluster();
    let mut run =
        RunOrchestrator::new(dir.path().join("run"), cluster.clone(), RunnerConfig::default())
            .unwrap();

    assert!(matches!(
        run.set_explicit_groups(["cache"]),
        Err(Error::NoMatchingHosts(_))
    ));

    cluster.replace(
        HostGroupDocument::from_yaml(
            "all:\n  hosts:\n    c1: {}\n  children:\n    cache:\n      hosts:\n        c1: {}\n",
        )
        .unwrap(),
    );

    let resolved = run.set_explicit_groups(["cache"]).unwrap();
    assert_eq!(resolved.get("c1"), Some(&vec!["cache".to_string()]));
}

#[test]
fn test_group_resolution_provenance() {
    let dir = TempDir::new().unwrap();
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();

    let resolved = run.set_explicit_groups(["web", "db"]).unwrap();
    let entries: Vec<(&str, Vec<&str>)> = resolved
        .iter()
        .map(|(h, g)| (h.as_str(), g.iter().map(String::as_str).collect()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("h1", vec!["web"]),
            ("h2", vec!["web", "db"]),
            ("h3", vec!["db"]),
        ]
    );
}

#[test]
fn test_retargeting_discards_invocation() {
    let dir = TempDir::new().unwrap();
    let playbook = write_playbook(dir.path());
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();
    run.prepare_workspace().unwrap();
    run.stage_playbook(&playbook).unwrap();
    run.build_invocation("first").unwrap();
    assert_eq!(run.state(), RunState::InvocationBuilt);

    run.set_explicit_hosts(["h3"]).unwrap();
    assert_eq!(run.state(), RunState::PlaybookStaged);
    assert!(run.invocation().is_none());

    let second = run.build_invocation("second").unwrap();
    assert_eq!(second.ident(), "second");
    assert_eq!(second.targets().unwrap().host_names(), vec!["h3"]);
}

#[test]
fn test_invalid_ident_rejected() {
    let dir = TempDir::new().unwrap();
    let playbook = write_playbook(dir.path());
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::default(),
    )
    .unwrap();
    run.prepare_workspace().unwrap();
    run.stage_playbook(&playbook).unwrap();

    for ident in ["", "../escape", "--hosts", "two words"] {
        assert!(matches!(
            run.build_invocation(ident),
            Err(Error::InvalidRunIdentifier(_))
        ));
    }
    assert!(run.invocation().is_none());
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_execute_reports_runner_exit_code() {
    let dir = TempDir::new().unwrap();
    let (script, record) = fake_runner(dir.path(), 3);
    let playbook = write_playbook(dir.path());
    let base = dir.path().join("run");

    let runner = RunnerConfig::locate(script.to_str().unwrap()).unwrap();
    let mut run = RunOrchestrator::new(&base, scenario_cluster(), runner).unwrap();
    run.prepare_workspace().unwrap();
    run.set_explicit_groups(["db"]).unwrap();
    run.stage_playbook(&playbook).unwrap();
    run.build_invocation("ident-1").unwrap();

    let status = run.execute().unwrap();
    assert_eq!(status.code(), Some(3));

    let args = fs::read_to_string(&record).unwrap();
    let staged = base.join("inventory/site.yml");
    assert_eq!(
        args.lines().collect::<Vec<_>>(),
        vec![
            "-p",
            staged.to_str().unwrap(),
            "-i",
            "ident-1",
            "run",
            base.to_str().unwrap(),
            "--hosts",
            "h2,h3",
        ]
    );
}

#[test]
fn test_execute_without_override_uses_inventory() {
    let dir = TempDir::new().unwrap();
    let (script, record) = fake_runner(dir.path(), 0);
    let playbook = write_playbook(dir.path());

    let runner = RunnerConfig::locate(script.to_str().unwrap()).unwrap();
    let mut run =
        RunOrchestrator::new(dir.path().join("run"), scenario_cluster(), runner).unwrap();
    run.prepare_workspace().unwrap();
    run.stage_inventory().unwrap();
    run.stage_playbook(&playbook).unwrap();
    run.build_invocation("plain").unwrap();

    assert!(run.execute().unwrap().success());
    let args = fs::read_to_string(&record).unwrap();
    assert!(!args.contains("--hosts"));
}

#[test]
fn test_execute_missing_runner() {
    let dir = TempDir::new().unwrap();
    let playbook = write_playbook(dir.path());
    let mut run = RunOrchestrator::new(
        dir.path().join("run"),
        scenario_cluster(),
        RunnerConfig::new(dir.path().join("no-such-runner")),
    )
    .unwrap();
    run.prepare_workspace().unwrap();
    run.stage_playbook(&playbook).unwrap();
    run.build_invocation("x").unwrap();

    assert!(matches!(run.execute(), Err(Error::RunnerSpawn { .. })));
}

#[test]
fn test_runs_from_store_cluster() {
    let dir = TempDir::new().unwrap();
    let mut store = InventoryStore::open(dir.path()).unwrap();
    let cluster = store.create_cluster("prod", ["n1", "n2"]).unwrap();

    let mut run = RunOrchestrator::new(
        dir.path().join("runs/abc"),
        cluster,
        RunnerConfig::default(),
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("runs")).unwrap();
    run.prepare_workspace().unwrap();

    let resolved = run.set_explicit_groups(["all", "gluster"]).unwrap();
    assert_eq!(resolved.get("n1"), Some(&vec!["gluster".to_string()]));
    assert_eq!(resolved.len(), 2);
}
