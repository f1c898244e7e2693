//! Cluster inventory management for gadmin.
//!
//! This module provides:
//! - The per-cluster host/group document and its YAML wire format
//! - Group-based target resolution with per-host group provenance
//! - The on-disk store of cluster documents

pub mod document;
pub mod group;
pub mod host;
pub mod store;

pub use document::{HostGroupDocument, TargetResolution, ALL_GROUP, DEFAULT_GROUP};
pub use group::HostGroup;
pub use host::{Host, HostMap, HostVars};
pub use store::{Cluster, InventoryStore, SharedDocument, DOCUMENT_SUFFIX, INVENTORY_DIR};
