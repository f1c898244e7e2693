//! Hosts command - resolve which hosts a set of groups targets

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use gadmin::inventory::ALL_GROUP;

/// Arguments for the hosts command
#[derive(Parser, Debug, Clone)]
pub struct HostsArgs {
    /// Cluster name
    pub cluster: String,

    /// Groups to resolve (repeatable)
    #[arg(short = 'g', long = "group", default_value = ALL_GROUP)]
    pub groups: Vec<String>,
}

impl Runnable for HostsArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        let cluster = ctx.home()?.inventory_mut().load_cluster(&self.cluster)?;
        let resolved = cluster.document().resolve_targets(self.groups.as_slice());

        if ctx.output.is_json() {
            ctx.output.json(&resolved)?;
            return Ok(0);
        }

        if resolved.is_empty() {
            ctx.output.warning(&format!(
                "No hosts matched in cluster '{}' for groups: {}",
                cluster.name(),
                self.groups.join(", ")
            ));
            return Ok(gadmin::Error::NoMatchingHosts(self.groups.clone()).exit_code());
        }

        ctx.output.section(&format!(
            "{} host(s) in '{}'",
            resolved.len(),
            cluster.name()
        ));
        for (host, groups) in &resolved {
            ctx.output.host_line(host, groups);
        }
        Ok(0)
    }
}
