//! Filesystem access controls.
//!
//! Paths are confined to the gadmin home through [`ConfinedRoot`], and
//! directories and executables are checked with `access(2)` before use.

pub mod path;

pub use path::ConfinedRoot;

use crate::error::{Error, Result};
use nix::unistd::{access, AccessFlags};
use std::path::Path;

/// Ensure `path` is an existing, writable directory.
pub fn ensure_dir_writable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::WorkspaceNotWritable {
        path: path.to_path_buf(),
        message: format!("unable to access: {}", e),
    })?;

    if !metadata.is_dir() {
        return Err(Error::WorkspaceNotWritable {
            path: path.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    access(path, AccessFlags::W_OK).map_err(|e| Error::WorkspaceNotWritable {
        path: path.to_path_buf(),
        message: e.desc().to_string(),
    })
}

/// Ensure `path` is a regular file the current user may execute.
pub fn ensure_file_executable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::Config(format!("Unable to access '{}': {}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(Error::Config(format!("'{}' is not a file", path.display())));
    }

    access(path, AccessFlags::X_OK)
        .map_err(|_| Error::Config(format!("File '{}' is not executable", path.display())))
}
