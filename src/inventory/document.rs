//! The per-cluster inventory document.
//!
//! On disk a cluster is an Ansible YAML inventory with a single top-level
//! `all` group:
//!
//! ```yaml
//! all:
//!   hosts:
//!     192.168.100.71:
//!       var1: foo
//!     192.168.100.72: {}
//!   children:
//!     gluster:
//!       hosts:
//!         192.168.100.71: {}
//!         192.168.100.72: {}
//! ```
//!
//! `all.hosts` is the host universe of the cluster. `all.children` holds the
//! named groups. The group name `all` is synthetic and always resolves to
//! every key of `all.hosts`.

use super::group::{deserialize_groups, HostGroup};
use super::host::{deserialize_host_map, Host, HostMap, HostVars};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The reserved group name that always means every host.
pub const ALL_GROUP: &str = "all";

/// The group a freshly created cluster places its hosts in.
pub const DEFAULT_GROUP: &str = "gluster";

/// Hosts matched by a group resolution, each with the requested groups it
/// matched, in request order. Hosts reached only through `all` carry an
/// empty list.
pub type TargetResolution = IndexMap<String, Vec<String>>;

/// One cluster's inventory: hosts, groups and host variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroupDocument {
    all: InventoryRoot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct InventoryRoot {
    #[serde(default, deserialize_with = "deserialize_host_map")]
    hosts: HostMap,

    #[serde(rename = "children", default, deserialize_with = "deserialize_groups")]
    groups: IndexMap<String, HostGroup>,
}

impl HostGroupDocument {
    /// Build a document for a new cluster. Every host lands in `all.hosts`
    /// and in the default `gluster` group, without variables. An empty host
    /// list yields an empty `gluster` group.
    pub fn new<I, S>(cluster: &str, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = HostGroup::from_hosts(hosts);
        let hosts: HostMap = group
            .host_names()
            .map(|h| (h.to_string(), HostVars::new()))
            .collect();

        debug!(cluster, hosts = hosts.len(), "built inventory document");

        let mut groups = IndexMap::new();
        groups.insert(DEFAULT_GROUP.to_string(), group);

        Self {
            all: InventoryRoot { hosts, groups },
        }
    }

    /// Parse a document from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::malformed("<inline>", e))
    }

    /// Parse a document from raw bytes. `origin` names the source in errors.
    pub fn from_slice(origin: &str, bytes: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(bytes).map_err(|e| Error::malformed(origin, e))
    }

    /// Render the document as YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::Serialization)
    }

    /// Render the document as YAML bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_yaml().map(String::into_bytes)
    }

    /// Group names, `all` first, then stored groups in document order.
    /// A stored group literally named `all` is shadowed by the reserved one.
    pub fn group_names(&self) -> Vec<&str> {
        std::iter::once(ALL_GROUP)
            .chain(
                self.all
                    .groups
                    .keys()
                    .map(String::as_str)
                    .filter(|g| *g != ALL_GROUP),
            )
            .collect()
    }

    /// Check if a group exists; `all` always does
    pub fn has_group(&self, group: &str) -> bool {
        group == ALL_GROUP || self.all.groups.contains_key(group)
    }

    /// Every host name in the cluster
    pub fn all_host_names(&self) -> Vec<&str> {
        self.all.hosts.keys().map(String::as_str).collect()
    }

    /// Host names stored under a group. Unknown groups yield an empty list;
    /// `all` is not special-cased here.
    pub fn hosts_in_group(&self, group: &str) -> Vec<&str> {
        self.all
            .groups
            .get(group)
            .map(|g| g.host_names().collect())
            .unwrap_or_default()
    }

    /// Resolve a list of group names into the hosts they cover.
    ///
    /// Groups are processed in request order:
    /// - `all` adds every host not already present, with no group recorded;
    /// - unknown groups are skipped silently, so stale references degrade
    ///   to fewer targets instead of an error;
    /// - any other group appends its name to each member's list, creating
    ///   the entry on first sight.
    pub fn resolve_targets<S: AsRef<str>>(&self, groups: &[S]) -> TargetResolution {
        let mut resolved = TargetResolution::new();

        for group in groups.iter().map(AsRef::as_ref) {
            if group == ALL_GROUP {
                for host in self.all.hosts.keys() {
                    resolved.entry(host.clone()).or_default();
                }
                continue;
            }

            let Some(members) = self.all.groups.get(group) else {
                debug!(group, "skipping unknown group");
                continue;
            };

            for host in members.host_names() {
                resolved
                    .entry(host.to_string())
                    .or_default()
                    .push(group.to_string());
            }
        }

        resolved
    }

    /// Look up a host and its variables
    pub fn host(&self, name: &str) -> Option<Host> {
        self.all.hosts.get(name).map(|vars| Host {
            name: name.to_string(),
            vars: vars.clone(),
        })
    }

    /// All hosts with their variables
    pub fn hosts(&self) -> impl Iterator<Item = Host> + '_ {
        self.all.hosts.iter().map(|(name, vars)| Host {
            name: name.clone(),
            vars: vars.clone(),
        })
    }

    /// Stored groups in document order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &HostGroup)> {
        self.all.groups.iter().map(|(name, g)| (name.as_str(), g))
    }

    /// Group members that are missing from the host universe, as
    /// `(group, host)` pairs. They are kept as stored and still resolve.
    pub fn dangling_hosts(&self) -> Vec<(&str, &str)> {
        self.all
            .groups
            .iter()
            .flat_map(|(group, members)| {
                members
                    .host_names()
                    .filter(|h| !self.all.hosts.contains_key(*h))
                    .map(move |h| (group.as_str(), h))
            })
            .collect()
    }

    /// Count total hosts
    pub fn host_count(&self) -> usize {
        self.all.hosts.len()
    }

    /// Count stored groups
    pub fn group_count(&self) -> usize {
        self.all.groups.len()
    }
}

impl std::fmt::Display for HostGroupDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Inventory ({} hosts, {} groups)",
            self.host_count(),
            self.group_count()
        )?;

        for (name, group) in self.groups() {
            writeln!(f, "  [{}]", name)?;
            for host in group.host_names() {
                writeln!(f, "    {}", host)?;
            }
        }

        Ok(())
    }
}
