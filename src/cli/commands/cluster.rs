//! Cluster commands - list, create and show clusters
//!
//! This module implements the `cluster` subcommands.

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::{Parser, Subcommand};
use gadmin::inventory::HostGroupDocument;
use serde::Serialize;

/// Cluster subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommand {
    /// List clusters in the inventory
    List,

    /// Create a cluster from a list of hosts
    Create(CreateArgs),

    /// Show a cluster's hosts and groups
    Show(ShowArgs),
}

/// Arguments for cluster create
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Cluster name
    pub name: String,

    /// Hosts to place in the cluster's gluster group
    pub hosts: Vec<String>,
}

/// Arguments for cluster show
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Cluster name
    pub name: String,

    /// Print the raw inventory document
    #[arg(long)]
    pub yaml: bool,
}

/// Cluster summary for JSON output
#[derive(Debug, Serialize)]
struct ClusterInfo<'a> {
    name: &'a str,
    hosts: Vec<&'a str>,
    groups: Vec<GroupInfo<'a>>,
}

/// Group summary for JSON output
#[derive(Debug, Serialize)]
struct GroupInfo<'a> {
    name: &'a str,
    hosts: Vec<&'a str>,
}

impl ClusterInfo<'_> {
    fn from_document<'a>(name: &'a str, doc: &'a HostGroupDocument) -> ClusterInfo<'a> {
        ClusterInfo {
            name,
            hosts: doc.all_host_names(),
            groups: doc
                .groups()
                .map(|(group, members)| GroupInfo {
                    name: group,
                    hosts: members.host_names().collect(),
                })
                .collect(),
        }
    }
}

impl Runnable for ClusterCommand {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        match self {
            ClusterCommand::List => list(ctx),
            ClusterCommand::Create(args) => create(args, ctx),
            ClusterCommand::Show(args) => show(args, ctx),
        }
    }
}

fn list(ctx: &mut CommandContext) -> Result<i32> {
    let names = ctx.home()?.inventory().list_clusters().to_vec();

    if ctx.output.is_json() {
        ctx.output.json(&names)?;
        return Ok(0);
    }

    ctx.output.section("Clusters");
    if names.is_empty() {
        ctx.output.line("  (none)");
    }
    for name in &names {
        ctx.output.line(&format!("  {}", name));
    }
    Ok(0)
}

fn create(args: &CreateArgs, ctx: &mut CommandContext) -> Result<i32> {
    let cluster = ctx
        .home()?
        .inventory_mut()
        .create_cluster(&args.name, args.hosts.iter().cloned())?;

    let doc = cluster.document();
    if ctx.output.is_json() {
        ctx.output
            .json(&ClusterInfo::from_document(cluster.name(), &doc))?;
    } else {
        ctx.output.info(&format!(
            "Created cluster '{}' with {} host(s)",
            cluster.name(),
            doc.host_count()
        ));
    }
    Ok(0)
}

fn show(args: &ShowArgs, ctx: &mut CommandContext) -> Result<i32> {
    let cluster = ctx.home()?.inventory_mut().load_cluster(&args.name)?;
    let doc = cluster.document();

    if ctx.output.is_json() {
        ctx.output
            .json(&ClusterInfo::from_document(cluster.name(), &doc))?;
        return Ok(0);
    }

    if args.yaml {
        print!("{}", doc.to_yaml()?);
        return Ok(0);
    }

    ctx.output.banner(&format!("CLUSTER {}", cluster.name()));
    ctx.output.section("Hosts");
    for host in doc.hosts() {
        ctx.output.line(&format!("  {}", host));
    }

    for (group, members) in doc.groups() {
        ctx.output
            .section(&format!("Group {} ({} hosts)", group, members.host_count()));
        for host in members.host_names() {
            ctx.output.line(&format!("  {}", host));
        }
    }

    for (group, host) in doc.dangling_hosts() {
        ctx.output.warning(&format!(
            "host '{}' in group '{}' is not a cluster host",
            host, group
        ));
    }
    Ok(0)
}
