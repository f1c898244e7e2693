//! Host definitions for the cluster inventory.
//!
//! A host is identified by its name and carries a flat map of string
//! variables. Ansible allows a bare `hostname:` entry with no mapping, so
//! null values are read back as empty variable maps.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Variables attached to a single host (`"var1": "val"`).
pub type HostVars = IndexMap<String, String>;

/// Hosts keyed by name (`"hostname": {"var1": "val"}`).
pub type HostMap = IndexMap<String, HostVars>;

/// A host and its variables, detached from the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host name (usually an address)
    pub name: String,

    /// Host-specific variables
    pub vars: HostVars,
}

impl Host {
    /// Create a new host with no variables
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: HostVars::new(),
        }
    }

    /// Set a variable on this host
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Get a variable from this host
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.vars {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Deserialize a host map, accepting `null` for the map itself and for
/// any host's variables.
pub(crate) fn deserialize_host_map<'de, D>(deserializer: D) -> Result<HostMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<HostVars>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, vars)| (name, vars.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "deserialize_host_map")]
        hosts: HostMap,
    }

    #[test]
    fn test_null_host_vars_become_empty() {
        let w: Wrapper = serde_yaml::from_str("hosts:\n  10.0.0.1:\n  10.0.0.2:\n    zone: a\n").unwrap();
        assert!(w.hosts["10.0.0.1"].is_empty());
        assert_eq!(w.hosts["10.0.0.2"]["zone"], "a");
    }

    #[test]
    fn test_null_host_map_is_empty() {
        let w: Wrapper = serde_yaml::from_str("hosts:\n").unwrap();
        assert!(w.hosts.is_empty());
    }

    #[test]
    fn test_host_display() {
        let mut host = Host::new("node1");
        host.set_var("brick", "/data");
        assert_eq!(host.to_string(), "node1 brick=/data");
        assert_eq!(host.get_var("brick"), Some("/data"));
    }
}
