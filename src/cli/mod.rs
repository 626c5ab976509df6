//! CLI module for tidyphp
//!
//! ## Commands
//!
//! - `fix <file|dir>` - Apply the enabled rules to PHP files
//! - `describe [rule]` - Show rule documentation
//! - `list` - List rules and their priorities
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Token-stream fixers for PHP sources
#[derive(Parser, Debug)]
#[command(name = "tidyphp")]
#[command(version = VERSION)]
#[command(about = "Token-stream fixers for PHP sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply the enabled rules to PHP files
    Fix {
        /// File or directory to fix
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Report files that would change without modifying them
        #[arg(long)]
        check: bool,
        /// Show the changes as a diff without modifying files
        #[arg(long)]
        diff: bool,
        /// Configuration file (default: ./tidyphp.json when present)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show rule documentation
    Describe {
        /// Rule to describe (all rules when omitted)
        #[arg(value_name = "RULE")]
        rule: Option<String>,
    },

    /// List rules and their priorities
    List,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Fix {
            path,
            check,
            diff,
            config,
        } => commands::fix_files(&path, check, diff, config.as_deref()),
        Command::Describe { rule } => commands::describe_rules(rule.as_deref()),
        Command::List => commands::list_rules(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fix() {
        let cli = Cli::try_parse_from(["tidyphp", "fix", "src/", "--check", "--config", "ci.json"]).unwrap();
        if let Command::Fix {
            path,
            check,
            diff,
            config,
        } = cli.command
        {
            assert_eq!(path, PathBuf::from("src/"));
            assert!(check);
            assert!(!diff);
            assert_eq!(config, Some(PathBuf::from("ci.json")));
        } else {
            panic!("Expected Fix command");
        }
    }

    #[test]
    fn test_cli_parse_fix_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["tidyphp", "fix"]).unwrap();
        assert!(matches!(cli.command, Command::Fix { ref path, .. } if path == &PathBuf::from(".")));
    }

    #[test]
    fn test_cli_parse_describe() {
        let cli = Cli::try_parse_from(["tidyphp", "describe", "doctrine_migrations"]).unwrap();
        if let Command::Describe { rule } = cli.command {
            assert_eq!(rule.as_deref(), Some("doctrine_migrations"));
        } else {
            panic!("Expected Describe command");
        }

        let cli = Cli::try_parse_from(["tidyphp", "describe"]).unwrap();
        assert!(matches!(cli.command, Command::Describe { rule: None }));
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["tidyphp", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tidyphp"]).is_err());
    }
}
