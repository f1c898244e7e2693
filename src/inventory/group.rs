//! Group definition for the cluster inventory.
//!
//! A group is itself a host collection: under `children`, each group name
//! maps to an object with its own `hosts` mapping, mirroring the top level.

use super::host::{deserialize_host_map, HostMap, HostVars};
use serde::{Deserialize, Deserializer, Serialize};

/// A named subset of the cluster's hosts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroup {
    /// Member hosts, each with optional group-level overrides
    #[serde(default, deserialize_with = "deserialize_host_map")]
    pub hosts: HostMap,
}

impl HostGroup {
    /// Create a group containing the given hosts with no variables
    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| (h.into(), HostVars::new()))
                .collect(),
        }
    }

    /// Add a host to this group
    pub fn add_host(&mut self, host: impl Into<String>) {
        self.hosts.entry(host.into()).or_default();
    }

    /// Check if a host belongs to this group
    pub fn has_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// Member host names in document order
    pub fn host_names(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Number of member hosts
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Check if the group has no members
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Deserialize `children`, accepting `null` for the map and for any group.
pub(crate) fn deserialize_groups<'de, D>(
    deserializer: D,
) -> Result<indexmap::IndexMap<String, HostGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<indexmap::IndexMap<String, Option<HostGroup>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, group)| (name, group.unwrap_or_default()))
        .collect())
}
