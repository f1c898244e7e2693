//! Configuration module for gadmin
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - User configuration (~/.gadmin.toml, ~/.config/gadmin/gadmin.toml)
//! - Project configuration (./gadmin.toml)
//! - Environment variables
//! - Command-line arguments (applied by the CLI)

use crate::runner::DEFAULT_RUNNER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gadmin home directory; all runtime files live beneath it
    pub home: Option<PathBuf>,

    /// Runner settings
    pub runner: RunnerSettings,

    /// Run workspace settings
    pub workspace: WorkspaceSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Which runner executable to invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Executable name looked up on `$PATH`
    pub executable: String,

    /// Explicit executable path, bypassing the `$PATH` lookup
    pub path: Option<PathBuf>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            executable: DEFAULT_RUNNER.to_string(),
            path: None,
        }
    }
}

impl RunnerSettings {
    /// The name or path handed to the runner lookup
    pub fn lookup_target(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => self.executable.clone(),
        }
    }
}

/// Where run workspaces are created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Directory under the home holding one workspace per run
    pub runs_dir: PathBuf,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            runs_dir: PathBuf::from("runs"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when neither `-v` nor `RUST_LOG` is given
    pub level: Option<String>,
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge_from_file(&path)?;
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Get the list of configuration file paths to check, lowest priority first
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gadmin.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gadmin").join("gadmin.toml"));
        }

        paths.push(PathBuf::from("gadmin.toml"));

        if let Ok(env_config) = std::env::var("GADMIN_CONFIG") {
            paths.push(PathBuf::from(env_config));
        }

        paths
    }

    /// Merge configuration from a file
    pub fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one; set values in `other` win
    fn merge(&self, other: Config) -> Config {
        let runner_defaults = RunnerSettings::default();
        let workspace_defaults = WorkspaceSettings::default();

        Config {
            home: other.home.or_else(|| self.home.clone()),
            runner: RunnerSettings {
                executable: if other.runner.executable == runner_defaults.executable {
                    self.runner.executable.clone()
                } else {
                    other.runner.executable
                },
                path: other.runner.path.or_else(|| self.runner.path.clone()),
            },
            workspace: WorkspaceSettings {
                runs_dir: if other.workspace.runs_dir == workspace_defaults.runs_dir {
                    self.workspace.runs_dir.clone()
                } else {
                    other.workspace.runs_dir
                },
            },
            logging: LoggingSettings {
                level: other.logging.level.or_else(|| self.logging.level.clone()),
            },
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // GADMIN_HOME
        if let Ok(home) = std::env::var("GADMIN_HOME") {
            if !home.is_empty() {
                self.home = Some(PathBuf::from(home));
            }
        }

        // GADMIN_RUNNER: a bare name or a path
        if let Ok(runner) = std::env::var("GADMIN_RUNNER") {
            if runner.contains('/') {
                self.runner.path = Some(PathBuf::from(runner));
            } else if !runner.is_empty() {
                self.runner.executable = runner;
                self.runner.path = None;
            }
        }

        // GADMIN_LOG_LEVEL
        if let Ok(level) = std::env::var("GADMIN_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
    }

    /// Get the configured home directory
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.home.is_none());
        assert_eq!(config.runner.executable, "ansible-runner");
        assert_eq!(config.workspace.runs_dir, PathBuf::from("runs"));
    }

    #[test]
    fn test_config_merge() {
        let base = Config {
            home: Some(PathBuf::from("/srv/gadmin")),
            ..Config::default()
        };
        let other = Config {
            runner: RunnerSettings {
                executable: "my-runner".to_string(),
                path: None,
            },
            ..Config::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.home, Some(PathBuf::from("/srv/gadmin")));
        assert_eq!(merged.runner.executable, "my-runner");
    }

    #[test]
    fn test_lookup_target_prefers_path() {
        let settings = RunnerSettings {
            executable: "ansible-runner".to_string(),
            path: Some(PathBuf::from("/opt/bin/ansible-runner")),
        };
        assert_eq!(settings.lookup_target(), "/opt/bin/ansible-runner");
    }
}
