//! Run command - Execute a playbook against a cluster
//!
//! This module implements the `run` subcommand, which prepares a fresh run
//! workspace under the gadmin home and hands it to ansible-runner.

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use gadmin::runner::{Invocation, RunOrchestrator, RunnerConfig};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Exit code when the runner executable cannot be found
const RUNNER_NOT_FOUND: i32 = 253;

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Cluster to run against
    pub cluster: String,

    /// Path to the playbook file
    pub playbook: PathBuf,

    /// Limit the run to these hosts (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "groups")]
    pub hosts: Vec<String>,

    /// Limit the run to the hosts of these groups (repeatable)
    #[arg(short = 'g', long = "group")]
    pub groups: Vec<String>,

    /// Run identifier (defaults to a random UUID)
    #[arg(long)]
    pub ident: Option<String>,

    /// Prepare the workspace and print the runner command without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Prepared run description for JSON output
#[derive(Debug, Serialize)]
struct RunReport {
    cluster: String,
    ident: String,
    workspace: PathBuf,
    playbook: PathBuf,
    hosts: Option<Vec<String>>,
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
}

impl RunReport {
    fn new(cluster: &str, invocation: &Invocation) -> Self {
        Self {
            cluster: cluster.to_string(),
            ident: invocation.ident().to_string(),
            workspace: invocation.base_dir().to_path_buf(),
            playbook: invocation.playbook().to_path_buf(),
            hosts: invocation
                .targets()
                .map(|t| t.host_names().into_iter().map(String::from).collect()),
            command: invocation.command_line(),
            exit_code: None,
        }
    }
}

impl Runnable for RunArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        // The home is validated before anything else is looked up
        ctx.home()?;

        let lookup = ctx.config.runner.lookup_target();
        let runner = match RunnerConfig::locate(&lookup) {
            Ok(runner) => runner,
            Err(e) => {
                ctx.output.error(&e.to_string());
                return Ok(RUNNER_NOT_FOUND);
            }
        };

        let ident = self
            .ident
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let runs_dir = ctx.config.workspace.runs_dir.clone();

        let home = ctx.home()?;
        let cluster = home.inventory_mut().load_cluster(&self.cluster)?;
        let workspace = home.run_workspace(&runs_dir, &ident)?;

        let mut run = RunOrchestrator::with_workspace(workspace, cluster, runner);
        run.prepare_workspace()?;

        if !self.hosts.is_empty() {
            run.set_explicit_hosts(self.hosts.iter().cloned())?;
        } else if !self.groups.is_empty() {
            let resolved = run.set_explicit_groups(self.groups.iter().cloned())?;
            ctx.output
                .debug(&format!("Resolved {} host(s) from groups", resolved.len()));
        }

        run.stage_inventory()?;
        run.stage_playbook(&self.playbook)?;
        let mut report = RunReport::new(&self.cluster, run.build_invocation(&ident)?);

        if self.dry_run {
            if ctx.output.is_json() {
                ctx.output.json(&report)?;
            } else {
                ctx.output
                    .info(&format!("Workspace prepared at {}", report.workspace.display()));
                ctx.output.line(&report.command);
            }
            return Ok(0);
        }

        ctx.output.info(&format!(
            "Running {} against '{}' (ident {})",
            report.playbook.display(),
            self.cluster,
            ident
        ));
        ctx.output.debug(&report.command);

        let status = run.execute()?;
        let code = status.code().unwrap_or(1);

        if ctx.output.is_json() {
            report.exit_code = Some(code);
            ctx.output.json(&report)?;
        } else if !status.success() {
            ctx.output
                .warning(&format!("ansible-runner exited with {}", status));
        }

        Ok(code)
    }
}
