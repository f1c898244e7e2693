//! On-disk registry of cluster inventories.
//!
//! The store owns `<root>/inventory/`, holding one `<cluster>.yml` document
//! per cluster. Cluster names are discovered once when the store is opened;
//! afterwards the tracked set only grows through [`InventoryStore::create_cluster`]
//! and [`InventoryStore::load_cluster`].

use super::document::HostGroupDocument;
use crate::error::{Error, Result};
use crate::security::ConfinedRoot;
use parking_lot::{RwLock, RwLockReadGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Directory under the gadmin home that holds cluster documents
pub const INVENTORY_DIR: &str = "inventory";

/// File suffix of a cluster document
pub const DOCUMENT_SUFFIX: &str = ".yml";

/// A live inventory document shared between the store and orchestrators.
///
/// Single-writer rule: only whole-document replacement is offered, through
/// [`Cluster::replace`] or [`InventoryStore::reload_cluster`], and at most
/// one orchestration should touch a cluster at a time.
pub type SharedDocument = Arc<RwLock<HostGroupDocument>>;

/// A named cluster and a handle to its live inventory document.
///
/// Clones share the same document, so a replacement made through one
/// handle is seen by every other holder.
#[derive(Debug, Clone)]
pub struct Cluster {
    name: String,
    document: SharedDocument,
}

impl Cluster {
    /// Wrap a document under a cluster name
    pub fn new(name: impl Into<String>, document: HostGroupDocument) -> Self {
        Self {
            name: name.into(),
            document: Arc::new(RwLock::new(document)),
        }
    }

    /// Cluster name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read access to the current document
    pub fn document(&self) -> RwLockReadGuard<'_, HostGroupDocument> {
        self.document.read()
    }

    /// A copy of the current document
    pub fn snapshot(&self) -> HostGroupDocument {
        self.document.read().clone()
    }

    /// Replace the whole document, returning the previous one
    pub fn replace(&self, document: HostGroupDocument) -> HostGroupDocument {
        std::mem::replace(&mut *self.document.write(), document)
    }

    /// Check whether two handles share the same live document
    pub fn shares_document_with(&self, other: &Cluster) -> bool {
        Arc::ptr_eq(&self.document, &other.document)
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cluster '{}': {}", self.name, self.document())
    }
}

/// The directory of cluster inventory documents.
#[derive(Debug)]
pub struct InventoryStore {
    root: ConfinedRoot,
    cluster_names: Vec<String>,
}

impl InventoryStore {
    /// Open the store beneath `root_path`.
    ///
    /// The inventory directory is `root_path/inventory`, unless `root_path`
    /// already ends in `inventory`. A missing directory is an empty store;
    /// it is created on the first write.
    pub fn open(root_path: impl AsRef<Path>) -> Result<Self> {
        let root_path = root_path.as_ref();
        let base = ConfinedRoot::new(root_path)?;
        let root = if base.path().ends_with(INVENTORY_DIR) {
            base
        } else {
            base.join(INVENTORY_DIR)?
        };

        let cluster_names = discover_clusters(root.path())?;
        info!(
            path = %root,
            clusters = cluster_names.len(),
            "opened inventory store"
        );

        Ok(Self {
            root,
            cluster_names,
        })
    }

    /// The inventory directory
    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    /// Tracked cluster names: those discovered at open time plus every
    /// cluster created or loaded since
    pub fn list_clusters(&self) -> &[String] {
        &self.cluster_names
    }

    /// Check whether a cluster name is tracked
    pub fn contains_cluster(&self, name: &str) -> bool {
        self.cluster_names.iter().any(|n| n == name)
    }

    /// Path of the document for a cluster name
    pub fn cluster_path(&self, name: &str) -> Result<PathBuf> {
        validate_cluster_name(name)?;
        self.root.resolve(format!("{}{}", name, DOCUMENT_SUFFIX))
    }

    /// Load a tracked cluster from disk
    pub fn load_cluster(&mut self, name: &str) -> Result<Cluster> {
        if !self.contains_cluster(name) {
            return Err(Error::ClusterNotFound(name.to_string()));
        }

        let document = self.read_document(name)?;
        self.track(name);

        debug!(cluster = name, hosts = document.host_count(), "loaded cluster");
        Ok(Cluster::new(name, document))
    }

    /// Create a cluster whose hosts all sit in the default group, and
    /// persist it
    pub fn create_cluster<I, S>(&mut self, name: &str, hosts: I) -> Result<Cluster>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.contains_cluster(name) {
            return Err(Error::ClusterAlreadyExists(name.to_string()));
        }

        let document = HostGroupDocument::new(name, hosts);
        self.write_document(name, &document)?;
        self.track(name);

        info!(cluster = name, hosts = document.host_count(), "created cluster");
        Ok(Cluster::new(name, document))
    }

    /// Overwrite a tracked cluster's document with its current contents
    pub fn save_cluster(&self, cluster: &Cluster) -> Result<()> {
        if !self.contains_cluster(cluster.name()) {
            return Err(Error::ClusterNotFound(cluster.name().to_string()));
        }

        let document = cluster.snapshot();
        self.write_document(cluster.name(), &document)?;
        debug!(cluster = cluster.name(), "saved cluster");
        Ok(())
    }

    /// Re-read a cluster's document from disk into its shared handle, so
    /// every holder sees the persisted state
    pub fn reload_cluster(&self, cluster: &Cluster) -> Result<()> {
        if !self.contains_cluster(cluster.name()) {
            return Err(Error::ClusterNotFound(cluster.name().to_string()));
        }

        let document = self.read_document(cluster.name())?;
        cluster.replace(document);
        debug!(cluster = cluster.name(), "reloaded cluster");
        Ok(())
    }

    fn track(&mut self, name: &str) {
        if !self.contains_cluster(name) {
            self.cluster_names.push(name.to_string());
        }
    }

    fn read_document(&self, name: &str) -> Result<HostGroupDocument> {
        let path = self.cluster_path(name)?;
        let bytes = std::fs::read(&path)
            .map_err(|e| Error::persistence("Unable to load inventory file", &path, e))?;
        let document = HostGroupDocument::from_slice(name, &bytes)?;

        for (group, host) in document.dangling_hosts() {
            warn!(cluster = name, group, host, "group member is not a cluster host");
        }

        Ok(document)
    }

    fn write_document(&self, name: &str, document: &HostGroupDocument) -> Result<()> {
        let path = self.cluster_path(name)?;
        let bytes = document.to_bytes()?;

        std::fs::create_dir_all(self.root.path()).map_err(|e| {
            Error::persistence("Unable to create inventory directory", self.root.path(), e)
        })?;
        std::fs::write(&path, bytes)
            .map_err(|e| Error::persistence("Unable to write YAML inventory", &path, e))
    }
}

impl std::fmt::Display for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inventory at '{}' has {} clusters defined.",
            self.root,
            self.cluster_names.len()
        )
    }
}

/// Scan an inventory directory for cluster documents
fn discover_clusters(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::persistence("Unable to read inventory directory", dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| Error::persistence("Unable to read inventory directory", dir, e))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if let Some(name) = file_name.strip_suffix(DOCUMENT_SUFFIX) {
            if !name.is_empty() && entry.path().is_file() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Reject names that cannot map to a single file under the store root
fn validate_cluster_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_name(name, "name cannot be a directory reference"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_name(
            name,
            "name cannot contain path separators or null bytes",
        ));
    }
    Ok(())
}
