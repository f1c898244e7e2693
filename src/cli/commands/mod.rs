//! Subcommands module for gadmin CLI
//!
//! This module contains all the subcommand implementations.

pub mod cluster;
pub mod hosts;
pub mod run;

use crate::cli::output::OutputFormatter;
use anyhow::Result;
use gadmin::config::Config;
use gadmin::home::{ensure_not_root, GadminHome};
use std::path::PathBuf;

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration
    pub config: Config,
    /// Output formatter
    pub output: OutputFormatter,
    /// Home directory given on the command line or environment
    pub home_path: Option<PathBuf>,
    /// Opened home, on first use
    home: Option<GadminHome>,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, config: Config) -> Self {
        let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());

        Self {
            home_path: cli.home.clone().or_else(|| config.home.clone()),
            config,
            output,
            home: None,
        }
    }

    /// The gadmin home, validated on first access
    pub fn home(&mut self) -> Result<&mut GadminHome> {
        if let Some(home) = self.home.take() {
            return Ok(self.home.insert(home));
        }

        ensure_not_root()?;

        let path = self
            .home_path
            .clone()
            .ok_or_else(|| gadmin::Error::Config("$GADMIN_HOME not set".to_string()))?;

        self.output
            .debug(&format!("Using '{}' as the work directory", path.display()));
        Ok(self.home.insert(GadminHome::open(path)?))
    }
}

/// Trait for runnable commands
pub trait Runnable {
    /// Execute the command
    fn run(&self, ctx: &mut CommandContext) -> Result<i32>;
}
