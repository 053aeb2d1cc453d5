//! Contact Analytics - summary statistics for contact list CSVs
//!
//! A CLI tool that loads a contact list, normalizes its columns, and
//! writes a dashboard report of coverage, distributions, and top titles.
//!
//! Exit codes:
//!   0 - Success (coverage above threshold, or no --min-coverage set)
//!   1 - Runtime error (missing file, bad CSV, bad config, etc.)
//!   2 - Email or phone coverage below the --min-coverage threshold

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use analysis::FieldTable;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use source::SourceOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
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

    // Load configuration before logging so `verbose` in the file applies
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    info!("contact-analytics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run_report(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .contact-analytics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize fields, charts, and report sections.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, analyze, and write the report. Returns exit code (0 or 2).
fn run_report(args: Args, config: Config) -> Result<i32> {
    let input = args
        .input
        .clone()
        .context("An input CSV file is required")?;

    // Step 1: Load the records
    if !args.quiet {
        println!("📥 Loading contacts: {}", input.display());
    }

    let mut source_options = SourceOptions::from(&config.source);
    source_options.show_progress = !args.quiet;

    let records = source::load_records(&input, &source_options)
        .with_context(|| format!("Failed to load contacts from {}", input.display()))?;

    if records.is_empty() {
        warn!("No contact rows found in {}", input.display());
    }

    // Step 2: Compute the dashboard
    let table = FieldTable::from(&config.fields);
    let dashboard = analysis::build_dashboard(
        &records,
        &input.display().to_string(),
        &config.dashboard,
        &table,
    );

    // Step 3: Render and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard, &config.report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&dashboard, &config.report, &table)
        }
    };

    let output_path = output_path(&args, &config);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let stats = &dashboard.stats;
    if !args.quiet {
        println!("\n📊 Contact Summary:");
        println!("   Total contacts: {}", stats.total_contacts);
        println!("   Unique cities: {}", stats.unique_cities);
        println!(
            "   Email coverage: {}% | Phone coverage: {}%",
            stats.email_coverage, stats.phone_coverage
        );
        if let Some(top) = dashboard.top_titles.first() {
            println!("   Top title: {} ({})", top.name, top.count);
        }
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    // Check --min-coverage threshold
    if let Some(min) = args.min_coverage {
        let lowest = stats.email_coverage.min(stats.phone_coverage);
        if lowest < min {
            eprintln!(
                "\n⛔ Coverage {}% is below the required {}%. Failing (exit code 2).",
                lowest, min
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Where the report goes: explicit --output, else the configured path with
/// its extension matched to the output format.
fn output_path(args: &Args, config: &Config) -> PathBuf {
    if let Some(ref output) = args.output {
        return output.clone();
    }

    let path = PathBuf::from(&config.general.output);
    match args.format {
        OutputFormat::Json => path.with_extension("json"),
        OutputFormat::Markdown => path,
    }
}

/// Where the active configuration came from.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Unreadable(anyhow::Error),
}

impl ConfigOrigin {
    /// Logged once the subscriber is installed.
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(e))),
    }
}
