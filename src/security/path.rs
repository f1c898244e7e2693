//! Path confinement
//!
//! All files gadmin writes live beneath one base directory. A
//! [`ConfinedRoot`] is handed to the components that touch the filesystem
//! and resolves their relative paths, rejecting anything that would land
//! outside the root.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// A directory that every resolved path must stay within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfinedRoot {
    root: PathBuf,
}

impl ConfinedRoot {
    /// Confine paths to `root`. Relative roots are made absolute against
    /// the current directory; the root need not exist yet.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root)
            .map_err(|e| Error::persistence("Could not derive absolute path for", root, e))?;

        Ok(Self {
            root: normalize_path(&absolute),
        })
    }

    /// The confining directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` beneath the root. Leading `/` is treated as the root
    /// itself, and `..` may not climb above it.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let requested = path.as_ref();
        let mut resolved = self.root.clone();

        for component in requested.components() {
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    if resolved == self.root {
                        return Err(Error::PathEscape {
                            root: self.root.clone(),
                            path: requested.to_path_buf(),
                        });
                    }
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
            }
        }

        Ok(resolved)
    }

    /// A new root nested beneath this one
    pub fn join(&self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            root: self.resolve(path)?,
        })
    }

    /// Check whether an absolute path lies within the root
    pub fn contains(&self, path: &Path) -> bool {
        normalize_path(path).starts_with(&self.root)
    }
}

impl std::fmt::Display for ConfinedRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

/// Normalize a path by resolving . and .. components without filesystem access.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => {
                normalized.push(other);
            }
        }
    }

    normalized
}
