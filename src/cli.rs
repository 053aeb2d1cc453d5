//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Contact Analytics - summary statistics for contact list CSVs
///
/// Loads a contact list, normalizes its columns, and writes a dashboard
/// report with coverage percentages, distributions, and top job titles.
///
/// Examples:
///   contact-analytics --input contacts.csv
///   contact-analytics --input contacts.csv --format json --output dashboard.json
///   contact-analytics --input contacts.csv --top-titles 10 --title-field TITLE
///   contact-analytics --input contacts.csv --min-coverage 60
///   contact-analytics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Contact list CSV file to analyze
    ///
    /// The first row must hold column names. Not required with --init-config.
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting (contact_report.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .contact-analytics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of job titles to rank
    #[arg(long, value_name = "COUNT", env = "CONTACT_ANALYTICS_TOP_TITLES")]
    pub top_titles: Option<usize>,

    /// Column to rank as job title
    #[arg(long, value_name = "FIELD")]
    pub title_field: Option<String>,

    /// CSV field delimiter
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Fail if email or phone coverage is below this percentage
    ///
    /// Useful for checking list quality in pipelines. Exit code 2 when the
    /// threshold is not met.
    #[arg(long, value_name = "PERCENT")]
    pub min_coverage: Option<u8>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .contact-analytics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
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

        match self.input {
            Some(ref input) => {
                if !input.exists() {
                    return Err(format!("Input file does not exist: {}", input.display()));
                }
                if !input.is_file() {
                    return Err(format!("Input path is not a file: {}", input.display()));
                }
            }
            None => return Err("An input CSV file is required".to_string()),
        }

        if let Some(min) = self.min_coverage {
            if min > 100 {
                return Err("Minimum coverage must be between 0 and 100".to_string());
            }
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err("Delimiter must be a single ASCII character".to_string());
            }
        }

        if let Some(ref field) = self.title_field {
            if field.trim().is_empty() {
                return Err("Title field must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }
}
