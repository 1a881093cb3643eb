//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// order-report - user activity and order revenue reports
///
/// Aggregates new users, orders and order item revenue into daily,
/// weekly or monthly buckets and renders them as a table, Markdown or JSON.
///
/// Examples:
///   order-report --generate-sample --users 50 --days 30
///   order-report --period weekly --start 2025-01-01 --end 2025-03-01
///   order-report --period monthly --format json -o report.json
///   order-report --user-stats
///   order-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file (JSON) to read records from
    ///
    /// Defaults to the `[data] path` setting, `order_data.json` out of the box.
    #[arg(short, long, value_name = "FILE", env = "ORDER_REPORT_DATA")]
    pub data: Option<PathBuf>,

    /// First day of the report (YYYY-MM-DD, inclusive)
    ///
    /// Defaults to `lookback_days` before the end.
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// End of the report (YYYY-MM-DD, exclusive)
    ///
    /// Defaults to now.
    #[arg(short, long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Bucket size: daily, weekly or monthly
    #[arg(short, long, value_name = "PERIOD")]
    pub period: Option<String>,

    /// Output format (table, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .order-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Also print lifetime totals per user
    #[arg(long)]
    pub user_stats: bool,

    /// Generate random sample data into the dataset file and exit
    #[arg(long)]
    pub generate_sample: bool,

    /// Number of sample users to create
    #[arg(long, value_name = "COUNT", requires = "generate_sample")]
    pub users: Option<usize>,

    /// Number of days to spread sample data across
    #[arg(long, value_name = "DAYS", requires = "generate_sample")]
    pub days: Option<u32>,

    /// Seed for reproducible sample data
    #[arg(long, value_name = "SEED", requires = "generate_sample")]
    pub seed: Option<u64>,

    /// Generate a default .order-report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width text table (default)
    #[default]
    Table,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// An inverted date range is allowed and produces an empty report.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.generate_sample && self.user_stats {
            return Err("Cannot use both --generate-sample and --user-stats".to_string());
        }

        if let Some(users) = self.users {
            if users == 0 {
                return Err("Users must be at least 1".to_string());
            }
        }

        if let Some(days) = self.days {
            if days == 0 {
                return Err("Days must be at least 1".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if data.is_dir() {
                return Err(format!("Dataset path is a directory: {}", data.display()));
            }
        }

        Ok(())
    }
}
