//! Terminal output formatting
//!
//! Every handler writes through this formatter so `--json` and
//! `--no-color` behave the same across commands.

use colored::Colorize;
use serde::Serialize;

/// Formats handler output for humans or machines
pub struct OutputFormatter {
    json: bool,
    no_color: bool,
}

impl OutputFormatter {
    #[must_use]
    pub const fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    /// Whether structured output was requested
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success line (suppressed in JSON mode)
    pub fn success(&self, message: &str) {
        if self.json {
            return;
        }
        if self.no_color {
            println!("{message}");
        } else {
            println!("{}", message.green());
        }
    }

    /// Print an informational line (suppressed in JSON mode)
    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    /// Print a warning line to stderr
    pub fn warn(&self, message: &str) {
        if self.no_color {
            eprintln!("warning: {message}");
        } else {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    /// Print an error line to stderr
    pub fn error(&self, message: &str) {
        if self.no_color {
            eprintln!("error: {message}");
        } else {
            eprintln!("{} {message}", "error:".red().bold());
        }
    }

    /// Emit a value as pretty JSON (only in JSON mode)
    pub fn json_value<T: Serialize>(&self, value: &T) {
        if self.json {
            match serde_json::to_string_pretty(value) {
                Ok(s) => println!("{s}"),
                Err(e) => self.error(&format!("could not serialize output: {e}")),
            }
        }
    }

    /// Print a labeled field, right-padded label
    pub fn field(&self, label: &str, value: &str) {
        if self.json {
            return;
        }
        if self.no_color {
            println!("{label:<14} {value}");
        } else {
            println!("{:<14} {value}", label.dimmed());
        }
    }
}
