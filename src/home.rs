//! The gadmin home directory.
//!
//! All runtime files are written beneath one home directory: cluster
//! inventories under `inventory/`, run workspaces under the configured runs
//! directory. Opening a home validates it once; everything afterwards goes
//! through the [`ConfinedRoot`] it holds.

use crate::error::{Error, Result};
use crate::inventory::InventoryStore;
use crate::runner::RunWorkspace;
use crate::security::{ensure_dir_writable, ConfinedRoot};
use std::path::Path;
use tracing::info;

/// Refuse to operate with root privileges
pub fn ensure_not_root() -> Result<()> {
    if nix::unistd::geteuid().is_root() {
        return Err(Error::Config(
            "Running as root is not supported".to_string(),
        ));
    }
    Ok(())
}

/// A validated home directory and the inventory store inside it
#[derive(Debug)]
pub struct GadminHome {
    root: ConfinedRoot,
    inventory: InventoryStore,
}

impl GadminHome {
    /// Open `path` as the gadmin home. It must be an absolute path to an
    /// existing, writable directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_absolute() {
            return Err(Error::Config(format!(
                "GADMIN_HOME '{}' is not an absolute path",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(Error::Config(format!(
                "GADMIN_HOME '{}' doesn't exist or is not a directory",
                path.display()
            )));
        }

        ensure_dir_writable(path).map_err(|_| {
            Error::Config(format!("GADMIN_HOME '{}' is not writable", path.display()))
        })?;

        let root = ConfinedRoot::new(path)?;
        let inventory = InventoryStore::open(root.path())?;

        info!(home = %root, "using work directory");
        Ok(Self { root, inventory })
    }

    /// The home directory
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// The inventory store
    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    /// The inventory store, mutably
    pub fn inventory_mut(&mut self) -> &mut InventoryStore {
        &mut self.inventory
    }

    /// A fresh workspace for run `ident` beneath `runs_dir`. The runs
    /// directory is created if needed; the workspace itself is not.
    pub fn run_workspace(&self, runs_dir: impl AsRef<Path>, ident: &str) -> Result<RunWorkspace> {
        let runs = self.root.join(runs_dir)?;
        std::fs::create_dir_all(runs.path())
            .map_err(|e| Error::persistence("Unable to create runs directory", runs.path(), e))?;
        RunWorkspace::within(&runs, ident)
    }
}

impl std::fmt::Display for GadminHome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'gadmin' running against '{}'.\n{}",
            self.root, self.inventory
        )
    }
}
