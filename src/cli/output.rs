//! Output formatting module for gadmin
//!
//! Provides colored human output and a JSON mode for scripting.

use colored::Colorize;
use serde::Serialize;

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();

        Self {
            use_color,
            json_mode,
            verbosity,
        }
    }

    /// Whether JSON output was requested
    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Print a banner/header
    pub fn banner(&self, title: &str) {
        if self.json_mode {
            return;
        }

        let line = "=".repeat(title.len() + 4);
        if self.use_color {
            println!("\n{}", line.bright_blue());
            println!("{}", format!("  {}  ", title).bright_blue().bold());
            println!("{}\n", line.bright_blue());
        } else {
            println!("\n{}", line);
            println!("  {}  ", title);
            println!("{}\n", line);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Print a plain line of human output
    pub fn line(&self, message: &str) {
        if !self.json_mode {
            println!("{}", message);
        }
    }

    /// Print an informational message
    pub fn info(&self, message: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("{}", message.green());
        } else {
            println!("{}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "[WARNING]".yellow().bold(), message.yellow());
        } else {
            eprintln!("[WARNING] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message.red());
        } else {
            eprintln!("ERROR: {}", message);
        }
    }

    /// Print a debug message (only at -vv and above)
    pub fn debug(&self, message: &str) {
        if self.verbosity < 2 || self.json_mode {
            return;
        }

        if self.use_color {
            eprintln!("{}", message.bright_black());
        } else {
            eprintln!("{}", message);
        }
    }

    /// Print a host with its matched groups
    pub fn host_line(&self, host: &str, groups: &[String]) {
        if self.json_mode {
            return;
        }

        let host_str = if self.use_color {
            host.bright_white().bold().to_string()
        } else {
            host.to_string()
        };

        if groups.is_empty() {
            println!("  {}", host_str);
        } else {
            println!("  {} ({})", host_str, groups.join(", "));
        }
    }

    /// Print a value as JSON (JSON mode only)
    pub fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        if self.json_mode {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }
}
