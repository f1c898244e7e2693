//! Playbook run orchestration.
//!
//! A [`RunOrchestrator`] binds one workspace, one live cluster and one
//! runner executable, and walks a run through its states:
//!
//! ```text
//! Created -> TargetsResolved (optional) -> PlaybookStaged -> InvocationBuilt
//! ```
//!
//! Execution is only possible from `InvocationBuilt`. Changing the targets
//! or staging another playbook discards a built invocation, so what runs
//! always matches the latest configuration.

use super::invocation::{Invocation, TargetOverride};
use super::workspace::RunWorkspace;
use super::RunnerConfig;
use crate::error::{Error, Result};
use crate::inventory::{Cluster, TargetResolution};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{debug, info};

/// Where a run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing configured yet
    Created,
    /// An explicit target override is set
    TargetsResolved,
    /// A playbook is staged in the workspace
    PlaybookStaged,
    /// An invocation is ready to execute
    InvocationBuilt,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Created => "created",
            RunState::TargetsResolved => "targets resolved",
            RunState::PlaybookStaged => "playbook staged",
            RunState::InvocationBuilt => "invocation built",
        };
        write!(f, "{}", s)
    }
}

/// Drives a single playbook run against one cluster
#[derive(Debug)]
pub struct RunOrchestrator {
    workspace: RunWorkspace,
    cluster: Cluster,
    runner: RunnerConfig,
    targets: Option<TargetOverride>,
    playbook: Option<PathBuf>,
    invocation: Option<Invocation>,
}

impl RunOrchestrator {
    /// Bind an orchestrator to a workspace directory and a live cluster
    pub fn new(
        workspace_path: impl AsRef<Path>,
        cluster: Cluster,
        runner: RunnerConfig,
    ) -> Result<Self> {
        Ok(Self::with_workspace(
            RunWorkspace::new(workspace_path)?,
            cluster,
            runner,
        ))
    }

    /// Bind an orchestrator to an existing workspace value
    pub fn with_workspace(workspace: RunWorkspace, cluster: Cluster, runner: RunnerConfig) -> Self {
        debug!(
            cluster = cluster.name(),
            workspace = %workspace.base_dir().display(),
            "created run orchestrator"
        );

        Self {
            workspace,
            cluster,
            runner,
            targets: None,
            playbook: None,
            invocation: None,
        }
    }

    /// Current state of the run
    pub fn state(&self) -> RunState {
        if self.invocation.is_some() {
            RunState::InvocationBuilt
        } else if self.playbook.is_some() {
            RunState::PlaybookStaged
        } else if self.targets.is_some() {
            RunState::TargetsResolved
        } else {
            RunState::Created
        }
    }

    /// The bound workspace
    pub fn workspace(&self) -> &RunWorkspace {
        &self.workspace
    }

    /// The bound cluster
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// The explicit target override, if set
    pub fn targets(&self) -> Option<&TargetOverride> {
        self.targets.as_ref()
    }

    /// The staged playbook, if any
    pub fn staged_playbook(&self) -> Option<&Path> {
        self.playbook.as_deref()
    }

    /// The built invocation, if any
    pub fn invocation(&self) -> Option<&Invocation> {
        self.invocation.as_ref()
    }

    /// Create the workspace base and input directories
    pub fn prepare_workspace(&self) -> Result<()> {
        self.workspace.create_base_directory()?;
        self.workspace.create_input_directories()
    }

    /// Target exactly these hosts, bypassing group resolution
    pub fn set_explicit_hosts<I, S>(&mut self, hosts: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts: Vec<String> = hosts.into_iter().map(Into::into).collect();
        if hosts.is_empty() {
            return Err(Error::EmptyTarget("host"));
        }

        debug!(hosts = hosts.len(), "set explicit hosts");
        self.set_targets(TargetOverride::Hosts(hosts));
        Ok(())
    }

    /// Target the hosts of these groups, resolved against the cluster's
    /// current document. Returns the resolution that was stored.
    pub fn set_explicit_groups<I, S>(&mut self, groups: I) -> Result<TargetResolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<String> = groups.into_iter().map(Into::into).collect();
        if groups.is_empty() {
            return Err(Error::EmptyTarget("group"));
        }

        let resolved = self.cluster.document().resolve_targets(groups.as_slice());
        if resolved.is_empty() {
            return Err(Error::NoMatchingHosts(groups));
        }

        debug!(groups = ?groups, hosts = resolved.len(), "resolved explicit groups");
        self.set_targets(TargetOverride::Groups {
            groups,
            resolved: resolved.clone(),
        });
        Ok(resolved)
    }

    /// Drop any target override so the runner uses the full inventory
    pub fn clear_targets(&mut self) {
        self.targets = None;
        self.invocation = None;
    }

    /// Copy a playbook into the workspace
    pub fn stage_playbook(&mut self, path: impl AsRef<Path>) -> Result<&Path> {
        let staged = self.workspace.stage_playbook(path)?;
        self.invocation = None;
        Ok(self.playbook.insert(staged))
    }

    /// Write the cluster's current inventory into the workspace
    pub fn stage_inventory(&self) -> Result<PathBuf> {
        self.workspace.stage_inventory(&self.cluster)
    }

    /// Build the runner invocation for the staged playbook, replacing any
    /// previously built one
    pub fn build_invocation(&mut self, ident: &str) -> Result<&Invocation> {
        let Some(playbook) = &self.playbook else {
            return Err(Error::InvocationNotReady(
                "no playbook staged; call stage_playbook first",
            ));
        };

        let invocation = Invocation::new(
            self.runner.executable(),
            playbook.clone(),
            ident,
            self.workspace.base_dir(),
            self.targets.clone(),
        )?;

        info!(
            cluster = self.cluster.name(),
            ident,
            targets = self.targets.as_ref().map_or("inventory", TargetOverride::kind),
            "built runner invocation"
        );
        Ok(self.invocation.insert(invocation))
    }

    /// Run the built invocation once, blocking until the runner exits
    pub fn execute(&self) -> Result<ExitStatus> {
        let invocation = self.invocation.as_ref().ok_or(Error::InvocationNotReady(
            "invocation not built; call build_invocation first",
        ))?;
        invocation.run()
    }

    fn set_targets(&mut self, targets: TargetOverride) {
        self.targets = Some(targets);
        self.invocation = None;
    }
}
