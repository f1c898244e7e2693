//! Run workspace layout.
//!
//! Each orchestration run gets its own base directory laid out the way
//! ansible-runner expects:
//!
//! ```text
//! <base>/
//!   inventory/   staged playbook and cluster inventory
//!   project/     runner working state
//! ```
//!
//! Nothing here rolls back: if a later step fails, directories created by
//! earlier steps stay on disk.

use crate::error::{Error, Result};
use crate::inventory::Cluster;
use crate::security::{ensure_dir_writable, ConfinedRoot};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input directories created inside every workspace
pub const INPUT_DIRS: [&str; 2] = [INVENTORY_SUBDIR, PROJECT_SUBDIR];

/// Subdirectory receiving staged artifacts
pub const INVENTORY_SUBDIR: &str = "inventory";

/// Subdirectory for runner working state
pub const PROJECT_SUBDIR: &str = "project";

/// File name the cluster inventory is staged under
pub const STAGED_INVENTORY_FILE: &str = "hosts.yml";

/// The directory tree for one orchestration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWorkspace {
    base_dir: PathBuf,
}

impl RunWorkspace {
    /// Workspace rooted at `base_dir`, made absolute
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = ConfinedRoot::new(base_dir)?;
        Ok(Self {
            base_dir: base_dir.path().to_path_buf(),
        })
    }

    /// Workspace at `name` beneath a confining root
    pub fn within(root: &ConfinedRoot, name: &str) -> Result<Self> {
        let base_dir = root.resolve(name)?;
        if base_dir == root.path() {
            return Err(Error::PathEscape {
                root: root.path().to_path_buf(),
                path: PathBuf::from(name),
            });
        }
        Ok(Self { base_dir })
    }

    /// The workspace base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory receiving staged artifacts
    pub fn inventory_dir(&self) -> PathBuf {
        self.base_dir.join(INVENTORY_SUBDIR)
    }

    /// Directory for runner working state
    pub fn project_dir(&self) -> PathBuf {
        self.base_dir.join(PROJECT_SUBDIR)
    }

    /// Create the base directory. Fails if it already exists, so a
    /// workspace is never shared between runs.
    pub fn create_base_directory(&self) -> Result<()> {
        std::fs::create_dir(&self.base_dir).map_err(|source| Error::WorkspaceExists {
            path: self.base_dir.clone(),
            source,
        })?;
        debug!(path = %self.base_dir.display(), "created runner base directory");
        Ok(())
    }

    /// Create the `inventory` and `project` input directories
    pub fn create_input_directories(&self) -> Result<()> {
        ensure_dir_writable(&self.base_dir)?;

        for dir_name in INPUT_DIRS {
            let input_dir = self.base_dir.join(dir_name);
            std::fs::create_dir(&input_dir).map_err(|e| {
                Error::persistence("Unable to create runner input directory", &input_dir, e)
            })?;
        }

        debug!(path = %self.base_dir.display(), "created runner input directories");
        Ok(())
    }

    /// Copy a playbook byte-for-byte into the inventory directory under
    /// its base file name, returning the destination
    pub fn stage_playbook(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        let src = std::path::absolute(source).map_err(|e| Error::SourceNotReadable {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut input = open_regular_file(&src)?;
        let file_name = src.file_name().ok_or_else(|| Error::SourceNotReadable {
            path: src.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
        })?;

        let inventory_dir = self.inventory_dir();
        ensure_dir_writable(&inventory_dir)?;

        if file_name == std::ffi::OsStr::new(STAGED_INVENTORY_FILE) {
            return Err(Error::StagingConflict(inventory_dir.join(file_name)));
        }

        let dst = inventory_dir.join(file_name);
        if is_same_file(&src, &dst) {
            debug!(dst = %dst.display(), "playbook already staged");
            return Ok(dst);
        }

        let mut output = File::create(&dst)
            .map_err(|e| Error::persistence("Failed to create staged playbook", &dst, e))?;
        std::io::copy(&mut input, &mut output)
            .map_err(|e| Error::persistence("Failed to copy playbook to", &dst, e))?;
        output
            .sync_all()
            .map_err(|e| Error::persistence("Failed to flush staged playbook", &dst, e))?;

        debug!(src = %src.display(), dst = %dst.display(), "staged playbook");
        Ok(dst)
    }

    /// Write a cluster's current inventory into the inventory directory so
    /// the runner targets that cluster's hosts
    pub fn stage_inventory(&self, cluster: &Cluster) -> Result<PathBuf> {
        let inventory_dir = self.inventory_dir();
        ensure_dir_writable(&inventory_dir)?;

        let bytes = cluster.document().to_bytes()?;
        let dst = inventory_dir.join(STAGED_INVENTORY_FILE);
        std::fs::write(&dst, bytes)
            .map_err(|e| Error::persistence("Unable to write yaml file", &dst, e))?;

        debug!(cluster = cluster.name(), dst = %dst.display(), "staged inventory");
        Ok(dst)
    }
}

/// Both paths exist and name the same file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn open_regular_file(path: &Path) -> Result<File> {
    let not_readable = |source| Error::SourceNotReadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_readable)?;
    let metadata = file.metadata().map_err(not_readable)?;
    if !metadata.is_file() {
        return Err(not_readable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(file)
}
