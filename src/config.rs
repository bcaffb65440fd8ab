//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.deptboard.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use crate::fetch::DEFAULT_USERS_URL;
use crate::models::FoodItem;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".deptboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Users endpoint settings.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Column board settings.
    #[serde(default)]
    pub columns: ColumnsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Users endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// URL returning `{ "users": [...] }`.
    #[serde(default = "default_users_url")]
    pub users_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Page size sent as `?limit=`. 0 keeps the server default.
    #[serde(default)]
    pub limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            users_url: default_users_url(),
            timeout_seconds: default_timeout(),
            limit: 0,
        }
    }
}

fn default_users_url() -> String {
    DEFAULT_USERS_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Number of departments in the "largest" table. 0 disables it.
    #[serde(default = "default_largest")]
    pub largest_departments: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output: None,
            largest_departments: default_largest(),
        }
    }
}

fn default_largest() -> usize {
    5
}

/// Column board settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    /// Milliseconds before a moved item returns to Main.
    #[serde(default = "default_return_delay_ms")]
    pub return_delay_ms: u64,

    /// Items on the board, all starting in Main.
    #[serde(default = "crate::columns::default_items")]
    pub items: Vec<FoodItem>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            return_delay_ms: default_return_delay_ms(),
            items: crate::columns::default_items(),
        }
    }
}

fn default_return_delay_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.deptboard.toml` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if args.verbose {
            self.general.verbose = true;
        }

        match &args.command {
            Some(Command::Summary(summary)) => {
                if let Some(ref url) = summary.url {
                    self.fetch.users_url = url.clone();
                }
                if let Some(timeout) = summary.timeout {
                    self.fetch.timeout_seconds = timeout;
                }
                if let Some(limit) = summary.limit {
                    self.fetch.limit = limit;
                }
                if let Some(format) = summary.format {
                    self.report.format = format;
                }
                if let Some(ref output) = summary.output {
                    self.report.output = Some(output.display().to_string());
                }
            }
            Some(Command::Columns(columns)) => {
                if let Some(delay_ms) = columns.delay_ms {
                    self.columns.return_delay_ms = delay_ms;
                }
            }
            None => {}
        }
    }

    /// Log level from CLI flags and the `[general]` table.
    ///
    /// `--quiet` wins; otherwise either `--verbose` or `verbose = true`
    /// turns on debug output.
    pub fn log_level(&self, args: &Args) -> tracing::Level {
        let level = args.log_level();

        if self.general.verbose && level == tracing::Level::INFO {
            tracing::Level::DEBUG
        } else {
            level
        }
    }

    /// Check the merged configuration.
    pub fn validate(&self) -> Result<()> {
        let url = &self.fetch.users_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("Users URL must start with 'http://' or 'https://': {}", url);
        }

        if self.fetch.timeout_seconds == 0 {
            bail!("Timeout must be at least 1 second");
        }

        if self.columns.return_delay_ms == 0 {
            bail!("Return delay must be at least 1 millisecond");
        }

        let mut seen = HashSet::new();
        for item in &self.columns.items {
            if item.name.trim().is_empty() {
                bail!("Board items must have a name");
            }
            if item.category.as_str().trim().is_empty() {
                bail!("Board item '{}' has no category", item.name);
            }
            if !seen.insert(item.name.as_str()) {
                bail!("Duplicate board item: {}", item.name);
            }
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
