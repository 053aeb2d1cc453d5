//! CSV row source.
//!
//! Reads a contact list with a header row into an in-memory record set.
//! Values are kept exactly as written; cleaning them up is the normalizer's
//! job.

use crate::models::Record;
use csv::{ReaderBuilder, StringRecord, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const UTF8_BOM: char = '\u{feff}';

/// Errors raised while turning a CSV file into records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("CSV input has no header row")]
    MissingHeaders,
}

/// Options for reading a CSV file.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether to show a spinner while loading.
    pub show_progress: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            show_progress: false,
        }
    }
}

impl From<&crate::config::SourceConfig> for SourceOptions {
    fn from(config: &crate::config::SourceConfig) -> Self {
        let delimiter = if config.delimiter.is_ascii() {
            config.delimiter as u8
        } else {
            warn!(
                "Delimiter {:?} is not an ASCII character, using ','",
                config.delimiter
            );
            b','
        };

        Self {
            delimiter,
            show_progress: false,
        }
    }
}

/// Load every row of the CSV file at `path`.
pub fn load_records(path: &Path, options: &SourceOptions) -> Result<Vec<Record>, SourceError> {
    info!("Loading contacts from: {}", path.display());

    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let progress = options.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Reading contacts...");
        pb
    });

    let records = read_records(file, options, progress.as_ref());

    if let Some(pb) = progress {
        match &records {
            Ok(records) => pb.finish_with_message(format!("Loaded {} contacts", records.len())),
            Err(_) => pb.abandon_with_message("Failed to read contacts"),
        }
    }

    records
}

/// Parse CSV content from any reader.
pub fn read_records<R: Read>(
    reader: R,
    options: &SourceOptions,
    progress: Option<&ProgressBar>,
) -> Result<Vec<Record>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| SourceError::Csv { row: 0, source })?;
    let headers = clean_headers(headers);

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SourceError::MissingHeaders);
    }
    debug!("CSV headers: {:?}", headers);

    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|source| SourceError::Csv {
            row: index + 1,
            source,
        })?;

        // Blank lines never reach here; every parsed row is a contact.
        records.push(to_record(&headers, &row));

        if let Some(pb) = progress {
            if records.len() % 1000 == 0 {
                pb.set_message(format!("Read {} contacts...", records.len()));
            }
        }
    }

    debug!("Read {} records", records.len());
    Ok(records)
}

fn clean_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
            h.trim().to_string()
        })
        .collect()
}

/// Pair header names with row values. Short rows leave trailing fields out;
/// surplus values beyond the header are dropped.
fn to_record(headers: &[String], row: &StringRecord) -> Record {
    headers
        .iter()
        .zip(row.iter())
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), value))
        .collect()
}
