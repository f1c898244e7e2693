//! # Gadmin - Gluster Cluster Administration
//!
//! Gadmin keeps a registry of named host clusters and drives
//! [ansible-runner](https://ansible-runner.readthedocs.io/) against subsets
//! of their hosts.
//!
//! ## Core Concepts
//!
//! - **Cluster**: a named inventory document of hosts and groups
//! - **Inventory store**: the directory of cluster documents in the gadmin home
//! - **Workspace**: the directory tree prepared for one runner invocation
//! - **Orchestrator**: resolves targets, stages a playbook and builds the
//!   runner invocation for one run
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 CLI Interface                │
//! │        (clap-based command parsing)          │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                 GadminHome                   │
//! │      (validated, confined home directory)    │
//! └──────────────────────────────────────────────┘
//!            │                         │
//!            ▼                         ▼
//! ┌─────────────────────┐   ┌─────────────────────┐
//! │   InventoryStore    │──▶│   RunOrchestrator   │
//! │  (cluster docs on   │   │  (workspace, staged │
//! │      disk)          │   │   playbook, targets)│
//! └─────────────────────┘   └─────────────────────┘
//!                                      │
//!                                      ▼
//!                           ┌─────────────────────┐
//!                           │   ansible-runner    │
//!                           └─────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use gadmin::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut store = InventoryStore::open("/srv/gadmin")?;
//!     let cluster = store.create_cluster("prod", ["10.0.0.1", "10.0.0.2"])?;
//!
//!     let runner = RunnerConfig::locate("ansible-runner")?;
//!     let mut run = RunOrchestrator::new("/srv/gadmin/runs/1", cluster, runner)?;
//!     run.prepare_workspace()?;
//!     run.set_explicit_groups(["gluster"])?;
//!     run.stage_playbook("site.yml")?;
//!     run.build_invocation("1")?;
//!
//!     let status = run.execute()?;
//!     println!("runner exited with {}", status);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    // Error handling
    pub use crate::error::{Error, Result};

    // Inventory
    pub use crate::inventory::{Cluster, HostGroupDocument, InventoryStore, TargetResolution};

    // Runs
    pub use crate::runner::{Invocation, RunOrchestrator, RunState, RunWorkspace, RunnerConfig};

    // Home
    pub use crate::home::GadminHome;
}

/// Error types and result aliases for gadmin operations.
pub mod error;

/// Cluster inventory documents and their on-disk store.
pub mod inventory;

/// Run workspaces, runner invocations and run orchestration.
pub mod runner;

/// Path confinement and filesystem access checks.
pub mod security;

/// The validated gadmin home directory.
pub mod home;

/// Layered configuration from files and environment.
pub mod config;

pub use error::{Error, Result};
