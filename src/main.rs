//! order-report - user activity and order revenue reports
//!
//! A CLI tool that aggregates users, orders and order items from a
//! dataset into dense daily, weekly or monthly report rows.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable dataset, config, I/O, etc.)
//!   2 - Invalid request (unknown period)

mod cli;
mod config;
mod error;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use cli::{Args, OutputFormat};
use config::Config;
use error::ReportError;
use models::{Granularity, ReportEnvelope};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Load config before logging so `[general] verbose` applies
    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    info!("order-report v{}", env!("CARGO_PKG_VERSION"));
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Arguments: {:?}", args);

    let result = if args.generate_sample {
        run_generate_sample(&config)
    } else {
        run_report(&args, &config)
    };

    if let Err(e) = result {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Map an error to the process exit code.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ReportError>() {
        Some(report_err) if report_err.is_bad_request() => 2,
        _ => 1,
    }
}

/// Handle --init-config: generate a default .order-report.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE_NAME);
    println!("   Edit it to customize the dataset path, period, format and more.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so a report printed to stdout stays clean.
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

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so it returns the file it loaded from
/// instead of logging it.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        // Try explicit config path
        (Config::load(config_path)?, Some(config_path.clone()))
    } else {
        // Try default location
        match Config::load_default() {
            Ok(Some(config)) => (config, Some(PathBuf::from(config::CONFIG_FILE_NAME))),
            Ok(None) => (Config::default(), None),
            Err(e) => {
                eprintln!("Warning: failed to load config: {:#}", e);
                (Config::default(), None)
            }
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

/// Handle --generate-sample: append random records to the dataset file.
fn run_generate_sample(config: &Config) -> Result<()> {
    let data_path = config.data_path();

    let options = store::SampleOptions {
        users: config.sample.users,
        days: config.sample.days,
        seed: config.sample.seed,
    };

    println!(
        "🎲 Generating sample data: {} users over {} days...",
        options.users, options.days
    );

    let mut dataset = store::load_or_default(&data_path)
        .with_context(|| format!("Failed to load dataset {}", data_path.display()))?;

    let summary = store::generate_sample_data(&mut dataset, &options, Utc::now())?;

    store::save_dataset(&dataset, &data_path)
        .with_context(|| format!("Failed to write dataset {}", data_path.display()))?;

    println!("\n✅ Sample data generated successfully!");
    println!("   Users created: {}", summary.users);
    if summary.skipped > 0 {
        println!("   Users skipped: {}", summary.skipped);
    }
    println!("   Orders created: {}", summary.orders);
    println!("   Order items A created: {}", summary.items_a);
    println!("   Order items B created: {}", summary.items_b);
    println!("\n   Generate a report with: order-report --period daily");

    Ok(())
}

/// Resolve the report range: dates map to midnight UTC, the end defaults to
/// now and the start to `lookback_days` before the end.
fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    lookback_days: u32,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let end = end
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .unwrap_or(now);
    let start = match start {
        Some(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => end
            .checked_sub_signed(Duration::days(i64::from(lookback_days)))
            .with_context(|| format!("lookback_days = {} reaches out of range", lookback_days))?,
    };

    Ok((start, end))
}

/// Render the envelope in the requested format.
///
/// JSON output stays a single document, with user statistics embedded under
/// `users`; the text formats append a user table instead.
fn render_report(envelope: &ReportEnvelope, format: OutputFormat) -> Result<String> {
    let mut output = match format {
        OutputFormat::Table => report::generate_table_report(&envelope.data),
        OutputFormat::Markdown => report::generate_markdown_report(envelope),
        OutputFormat::Json => report::generate_json_report(envelope)?,
    };

    if let (Some(stats), OutputFormat::Table | OutputFormat::Markdown) = (&envelope.users, format) {
        output.push('\n');
        output.push_str(&report::generate_user_stats_table(stats));
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

/// Run the report workflow.
fn run_report(args: &Args, config: &Config) -> Result<()> {
    // Reject an unknown period before touching the dataset
    let granularity: Granularity = config.report.period.parse()?;

    let (start, end) = resolve_range(args.start, args.end, config.report.lookback_days, Utc::now())?;
    info!(
        "Generating {} report from {} to {}",
        granularity,
        start.date_naive(),
        end.date_naive()
    );

    let data_path = config.data_path();
    let dataset = store::load_dataset(&data_path)
        .map_err(ReportError::from)
        .with_context(|| {
            format!(
                "Failed to load dataset {} (run with --generate-sample to create one)",
                data_path.display()
            )
        })?;

    let users = args.user_stats.then(|| report::user_statistics(&dataset));

    let source = store::InMemorySource::new(dataset);
    let rows = report::generate_report(&source, start, end, &config.report.period)?;

    let envelope = ReportEnvelope {
        period: granularity,
        start_date: start.date_naive(),
        end_date: end.date_naive(),
        data: rows,
        users,
    };

    let output = render_report(&envelope, config.report.format)?;

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "✅ Report generated with {} periods. Saved to: {}",
                envelope.data.len(),
                path.display()
            );
        }
        None => print!("{}", output),
    }

    Ok(())
}
