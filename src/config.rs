//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.order-report.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".order-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Sample data settings.
    #[serde(default)]
    pub sample: SampleConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output file. Reports go to stdout when unset.
    #[serde(default)]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the JSON dataset file.
    #[serde(default = "default_data_path")]
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "order_data.json".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Bucket size: daily, weekly or monthly.
    ///
    /// Kept as text so a bad value is reported by the report engine.
    #[serde(default = "default_period")]
    pub period: String,

    /// Days covered when no start date is given.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            lookback_days: default_lookback_days(),
            format: OutputFormat::default(),
        }
    }
}

fn default_period() -> String {
    "daily".to_string()
}

fn default_lookback_days() -> u32 {
    30
}

/// Sample data generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Number of users to create.
    #[serde(default = "default_sample_users")]
    pub users: usize,

    /// Number of days to spread data across.
    #[serde(default = "default_sample_days")]
    pub days: u32,

    /// Seed for reproducible data.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            users: default_sample_users(),
            days: default_sample_days(),
            seed: None,
        }
    }
}

fn default_sample_users() -> usize {
    10
}

fn default_sample_days() -> u32 {
    7
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

    /// Try to load configuration from a directory.
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
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.display().to_string();
        }

        if let Some(ref period) = args.period {
            self.report.period = period.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if let Some(users) = args.users {
            self.sample.users = users;
        }
        if let Some(days) = args.days {
            self.sample.days = days;
        }
        if args.seed.is_some() {
            self.sample.seed = args.seed;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Dataset file path.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data.path)
    }

    /// Report output path, if the report should go to a file.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.general.output.as_ref().map(PathBuf::from)
    }

    /// Log level for this run.
    ///
    /// `verbose` (from the file or `--verbose`) raises it to DEBUG; `quiet`
    /// always wins.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
