//! Driving ansible-runner against cluster hosts.
//!
//! - [`workspace`] lays out the per-run directory tree and stages artifacts
//! - [`invocation`] describes the runner process for one run
//! - [`orchestrator`] sequences a run from target selection to execution

pub mod invocation;
pub mod orchestrator;
pub mod workspace;

pub use invocation::{Invocation, TargetOverride};
pub use orchestrator::{RunOrchestrator, RunState};
pub use workspace::RunWorkspace;

use crate::error::{Error, Result};
use crate::security::ensure_file_executable;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Executable name looked up on `$PATH` when none is configured
pub const DEFAULT_RUNNER: &str = "ansible-runner";

/// The runner executable a run invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    executable: PathBuf,
}

impl RunnerConfig {
    /// Use `executable` as given, without checks
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Find the runner: an explicit path is used as-is, a bare name is
    /// looked up on `$PATH`. Either way the result must be an executable
    /// regular file.
    pub fn locate(name_or_path: &str) -> Result<Self> {
        let candidate = Path::new(name_or_path);
        let executable = if candidate.components().count() > 1 {
            candidate.to_path_buf()
        } else {
            which::which(name_or_path).map_err(|e| {
                Error::Config(format!("{} not found in $PATH: {}", name_or_path, e))
            })?
        };

        ensure_file_executable(&executable)?;
        debug!(runner = %executable.display(), "located runner");
        Ok(Self { executable })
    }

    /// Runner executable path
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RUNNER)
    }
}
