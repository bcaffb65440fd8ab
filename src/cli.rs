//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// deptboard - department user summaries and a timed column board
///
/// Examples:
///   deptboard summary
///   deptboard summary --format json --output users.json
///   deptboard summary --url http://localhost:8080/users --limit 100
///   deptboard columns --delay-ms 2000
///   deptboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(subcommand_required = false, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .deptboard.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .deptboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch users and print per-department statistics
    Summary(SummaryArgs),
    /// Interactive board: move items into their category column
    Columns(ColumnsArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    /// Users endpoint URL
    #[arg(long, value_name = "URL", env = "DEPTBOARD_USERS_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of users to request (0 = server default)
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ColumnsArgs {
    /// Milliseconds before a moved item returns to the main list
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A command is required: 'summary' or 'columns'".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Some(Command::Summary(summary)) => {
                if let Some(ref url) = summary.url {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        return Err("Users URL must start with 'http://' or 'https://'".to_string());
                    }
                }
                if summary.timeout == Some(0) {
                    return Err("Timeout must be at least 1 second".to_string());
                }
            }
            Some(Command::Columns(columns)) => {
                if columns.delay_ms == Some(0) {
                    return Err("Delay must be at least 1 millisecond".to_string());
                }
            }
            None => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            command: Some(Command::Summary(SummaryArgs::default())),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_summary_command() {
        let args = Args::try_parse_from([
            "deptboard",
            "summary",
            "--format",
            "json",
            "--limit",
            "50",
            "-o",
            "out.json",
        ])
        .unwrap();

        match args.command {
            Some(Command::Summary(summary)) => {
                assert_eq!(summary.format, Some(OutputFormat::Json));
                assert_eq!(summary.limit, Some(50));
                assert_eq!(summary.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_columns_command_with_global_flag() {
        let args = Args::try_parse_from(["deptboard", "columns", "--delay-ms", "250", "-v"]).unwrap();

        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Some(Command::Columns(ColumnsArgs { delay_ms: Some(250) }))
        ));
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.command = Some(Command::Summary(SummaryArgs {
            url: Some("invalid-url".to_string()),
            ..Default::default()
        }));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_delay() {
        let mut args = make_args();
        args.command = Some(Command::Columns(ColumnsArgs { delay_ms: Some(0) }));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_requires_command() {
        let mut args = make_args();
        args.command = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
