//! deptboard - department user summaries and a timed column board
//!
//! `summary` fetches the remote user list, groups it by department and
//! prints the statistics. `columns` runs the interactive column board.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unwritable output, etc.)
//!   2 - No user data could be fetched

mod analysis;
mod cli;
mod columns;
mod config;
mod fetch;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use columns::{render_board, render_prompt, ColumnBoard, Selection, TimedMover};
use config::{Config, CONFIG_FILE_NAME};
use fetch::{FetchConfig, UserClient};
use indicatif::{ProgressBar, ProgressStyle};
use models::{ReportMetadata, UsersReport};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so it can raise the log level
    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("deptboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("deptboard failed: {}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .deptboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at `level`.
///
/// Logs go to stderr so reports on stdout stay clean.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch to the selected command. Returns the process exit code.
async fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);
    config.validate()?;

    match args.command {
        Some(Command::Summary(_)) => run_summary(&config, args.quiet).await,
        Some(Command::Columns(_)) => run_columns(&config).await,
        None => Ok(1),
    }
}

/// Fetch, aggregate and render the users summary.
async fn run_summary(config: &Config, quiet: bool) -> Result<i32> {
    let start_time = Instant::now();

    let client = UserClient::new(FetchConfig::from(&config.fetch))?;

    let spinner = fetch_spinner(quiet, client.users_url());
    let users = client.fetch_users().await;
    spinner.finish_and_clear();

    let metadata = ReportMetadata {
        source_url: client.users_url().to_string(),
        generated_at: Utc::now(),
        users_fetched: users.as_ref().map_or(0, Vec::len),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = match users {
        Some(users) => {
            let departments = analysis::aggregate(&users);
            info!(
                "Aggregated {} users into {} departments",
                users.len(),
                departments.len()
            );

            let largest = if config.report.largest_departments > 0 {
                analysis::largest_departments(&users, config.report.largest_departments)
            } else {
                Vec::new()
            };

            UsersReport {
                metadata,
                departments: Some(departments),
                largest_departments: largest,
            }
        }
        None => {
            warn!("No user data available; rendering error state");
            UsersReport::absent(metadata)
        }
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match config.report.output {
        Some(ref path) => {
            let path = PathBuf::from(path);
            report::write_report(&output, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(report.exit_code())
}

/// Spinner shown on stderr while the users are being fetched.
fn fetch_spinner(quiet: bool, url: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching users from {}", url));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Run the interactive column board until `quit` or end of input.
///
/// Selections from stdin and fired return timers are handled one at a
/// time on this task.
async fn run_columns(config: &Config) -> Result<i32> {
    let board = ColumnBoard::new(config.columns.items.iter().cloned());
    let delay = Duration::from_millis(config.columns.return_delay_ms);
    let mut mover = TimedMover::new(board, delay);

    info!(
        "Column board ready with {} items, return delay {:?}",
        mover.board().len(),
        delay
    );

    println!("{}", render_board(mover.board()));
    println!("{}", render_prompt(mover.board()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line.context("Failed to read from stdin")? {
                    Some(line) => line,
                    None => break,
                };

                match line.trim() {
                    "" => {}
                    "quit" | "exit" => break,
                    name => match mover.select(name) {
                        Ok(Selection::Moved { item, pending }) => {
                            println!(
                                "-> {} moved to {} (returns in {:?})",
                                item.name,
                                item.category.column_label(),
                                mover.delay()
                            );
                            // Fire-and-forget: the timer keeps running
                            drop(pending);
                        }
                        Ok(Selection::Returned { item, outcome }) => {
                            if outcome.is_noop() {
                                continue;
                            }
                            println!("<- {} returned to main list", item.name);
                        }
                        Err(e) => {
                            warn!("Ignoring selection: {}", e);
                            eprintln!("{}", e);
                            continue;
                        }
                    },
                }

                println!("{}", render_board(mover.board()));
            }
            Some(item) = mover.next_due() => {
                if !mover.apply_due(&item).is_noop() {
                    println!("<- {} returned to main list", item.name);
                    println!("{}", render_board(mover.board()));
                }
            }
        }
    }

    info!("Column board closed");
    Ok(0)
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    DefaultFileUnreadable(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::DefaultFileUnreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` that cannot be loaded is an error; a broken
/// default file falls back to built-in defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::BuiltIn)),
        Err(e) => Ok((
            Config::default(),
            ConfigSource::DefaultFileUnreadable(format!("{:#}", e)),
        )),
    }
}
