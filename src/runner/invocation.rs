//! The external runner invocation.
//!
//! An [`Invocation`] is a plain value describing one ansible-runner process:
//!
//! ```text
//! <runner> -p <playbook> -i <ident> run <base dir> [--hosts h1,h2,...]
//! ```
//!
//! Building one has no side effects. Running it is a separate, explicit
//! call that starts the process exactly once and blocks until it exits.

use crate::error::{Error, Result};
use crate::inventory::TargetResolution;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::info;

/// Flag preceding the playbook path
pub const PLAYBOOK_FLAG: &str = "-p";

/// Flag preceding the run identifier
pub const IDENT_FLAG: &str = "-i";

/// Runner sub-command
pub const RUN_SUBCOMMAND: &str = "run";

/// Flag preceding an explicit host list
pub const HOSTS_FLAG: &str = "--hosts";

/// Separator between hosts in the explicit host list
pub const HOST_SEPARATOR: &str = ",";

/// An explicit override of the hosts a run targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOverride {
    /// A literal host list, used as given
    Hosts(Vec<String>),

    /// Hosts resolved from a list of groups
    Groups {
        /// Requested group names
        groups: Vec<String>,
        /// Resolved hosts with the groups each matched
        resolved: TargetResolution,
    },
}

impl TargetOverride {
    /// Host names passed to the runner, in order
    pub fn host_names(&self) -> Vec<&str> {
        match self {
            TargetOverride::Hosts(hosts) => hosts.iter().map(String::as_str).collect(),
            TargetOverride::Groups { resolved, .. } => {
                resolved.keys().map(String::as_str).collect()
            }
        }
    }

    /// Short label for logs and messages
    pub fn kind(&self) -> &'static str {
        match self {
            TargetOverride::Hosts(_) => "hosts",
            TargetOverride::Groups { .. } => "groups",
        }
    }
}

/// A fully resolved description of one runner process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    executable: PathBuf,
    playbook: PathBuf,
    ident: String,
    base_dir: PathBuf,
    targets: Option<TargetOverride>,
}

impl Invocation {
    /// Describe a runner process, validating the run identifier
    pub fn new(
        executable: impl Into<PathBuf>,
        playbook: impl Into<PathBuf>,
        ident: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        targets: Option<TargetOverride>,
    ) -> Result<Self> {
        let ident = ident.into();
        validate_ident(&ident)?;

        Ok(Self {
            executable: executable.into(),
            playbook: playbook.into(),
            ident,
            base_dir: base_dir.into(),
            targets,
        })
    }

    /// Runner executable
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Staged playbook path
    pub fn playbook(&self) -> &Path {
        &self.playbook
    }

    /// Run identifier
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Workspace base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Explicit target override, if any
    pub fn targets(&self) -> Option<&TargetOverride> {
        self.targets.as_ref()
    }

    /// Arguments passed to the executable
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            PLAYBOOK_FLAG.into(),
            self.playbook.clone().into(),
            IDENT_FLAG.into(),
            self.ident.clone().into(),
            RUN_SUBCOMMAND.into(),
            self.base_dir.clone().into(),
        ];

        if let Some(targets) = &self.targets {
            args.push(HOSTS_FLAG.into());
            args.push(targets.host_names().join(HOST_SEPARATOR).into());
        }

        args
    }

    /// A process builder for this invocation
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.args());
        cmd
    }

    /// The invocation as a shell-quoted command line
    pub fn command_line(&self) -> String {
        let words: Vec<String> = std::iter::once(self.executable.as_os_str().to_os_string())
            .chain(self.args())
            .map(|w| w.to_string_lossy().into_owned())
            .collect();
        shell_words::join(words)
    }

    /// Start the runner once and wait for it to exit
    pub fn run(&self) -> Result<ExitStatus> {
        info!(ident = %self.ident, command = %self.command_line(), "starting runner");

        let status = self.command().status().map_err(|source| Error::RunnerSpawn {
            executable: self.executable.clone(),
            source,
        })?;

        info!(ident = %self.ident, code = ?status.code(), "runner exited");
        Ok(status)
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

/// The identifier names the runner's artifact directory and is passed as a
/// flag value, so it must be a single, non-flag path component.
fn validate_ident(ident: &str) -> Result<()> {
    let invalid = ident.is_empty()
        || ident == "."
        || ident == ".."
        || ident.starts_with('-')
        || ident.contains(['/', '\0'])
        || ident.chars().any(char::is_whitespace);

    if invalid {
        return Err(Error::InvalidRunIdentifier(ident.to_string()));
    }
    Ok(())
}
