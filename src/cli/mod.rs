//! CLI module for gadmin
//!
//! This module provides the command-line interface for gadmin,
//! including argument parsing and subcommand handling.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gadmin - Gluster cluster administration
///
/// Keeps an inventory of clusters and runs playbooks against them through
/// ansible-runner.
#[derive(Parser, Debug, Clone)]
#[command(name = "gadmin")]
#[command(author = "Gadmin Contributors")]
#[command(version)]
#[command(about = "Administer Gluster clusters through ansible-runner", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Gadmin home directory (absolute path)
    #[arg(long, global = true, env = "GADMIN_HOME")]
    pub home: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "GADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the home directory and inventory summary
    Info,

    /// Manage clusters in the inventory
    #[command(subcommand)]
    Cluster(commands::cluster::ClusterCommand),

    /// Resolve the hosts targeted by a set of groups
    Hosts(commands::hosts::HostsArgs),

    /// Run a playbook against a cluster
    Run(commands::run::RunArgs),
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        self.output == OutputFormat::Json
    }
}
