//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.contact-analytics.toml` files.

use crate::analysis::normalizer::NOT_SPECIFIED;
use crate::models::{fields, RankingPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".contact-analytics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// CSV input settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Per-field normalization rules.
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Which statistics and charts make up the dashboard.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "contact_report.md".to_string()
}

/// CSV input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Normalization rules, turned into a `FieldTable` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Label for blank values of fields without an explicit entry.
    #[serde(default = "default_fallback")]
    pub default_fallback: String,

    /// Fields with non-default rules, layered over the built-in currency
    /// fields. An entry with the same name replaces the built-in one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field: Vec<FieldEntry>,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            default_fallback: default_fallback(),
            field: Vec::new(),
        }
    }
}

impl FieldsConfig {
    /// Built-in entries followed by user entries, later names winning.
    pub fn effective_entries(&self) -> Vec<FieldEntry> {
        let mut entries = builtin_field_entries();

        for entry in &self.field {
            match entries.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => *existing = entry.clone(),
                None => entries.push(entry.clone()),
            }
        }

        entries
    }
}

/// Rules for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,

    /// Strip `$` and `,` before trimming.
    #[serde(default)]
    pub currency: bool,

    /// Overrides `default_fallback` for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_label: Option<String>,
}

fn default_fallback() -> String {
    NOT_SPECIFIED.to_string()
}

fn builtin_field_entries() -> Vec<FieldEntry> {
    [fields::INCOME_RANGE, fields::NET_WORTH]
        .into_iter()
        .map(|name| FieldEntry {
            name: name.to_string(),
            currency: true,
            fallback_label: None,
        })
        .collect()
}

/// Dashboard composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Column counted for "unique cities".
    #[serde(default = "default_city_field")]
    pub city_field: String,

    /// Free-text column ranked for the top titles card.
    #[serde(default = "default_title_field")]
    pub title_field: String,

    /// How many titles to rank.
    #[serde(default = "default_top_titles")]
    pub top_titles: usize,

    /// Columns that count towards email coverage (any of them).
    #[serde(default = "default_email_fields")]
    pub email_fields: Vec<String>,

    /// Columns that count towards phone coverage (any of them).
    #[serde(default = "default_phone_fields")]
    pub phone_fields: Vec<String>,

    /// Contact method cards.
    #[serde(default = "default_contact_methods")]
    pub contact_method: Vec<ContactMethodEntry>,

    /// Demographic distribution charts.
    #[serde(default = "default_demographics")]
    pub demographics: Vec<ChartEntry>,

    /// Status distribution charts.
    #[serde(default = "default_status")]
    pub status: Vec<ChartEntry>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            city_field: default_city_field(),
            title_field: default_title_field(),
            top_titles: default_top_titles(),
            email_fields: default_email_fields(),
            phone_fields: default_phone_fields(),
            contact_method: default_contact_methods(),
            demographics: default_demographics(),
            status: default_status(),
        }
    }
}

/// A labelled presence check on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethodEntry {
    pub label: String,
    pub field: String,
}

/// A distribution chart over one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub title: String,
    pub field: String,
    #[serde(default)]
    pub policy: RankingPolicy,
}

impl ChartEntry {
    fn new(title: &str, field: &str, policy: RankingPolicy) -> Self {
        Self {
            title: title.to_string(),
            field: field.to_string(),
            policy,
        }
    }
}

fn default_city_field() -> String {
    fields::PERSONAL_CITY.to_string()
}

fn default_title_field() -> String {
    fields::JOB_TITLE.to_string()
}

fn default_top_titles() -> usize {
    5
}

fn default_email_fields() -> Vec<String> {
    vec![
        fields::PERSONAL_EMAIL.to_string(),
        fields::BUSINESS_EMAIL.to_string(),
    ]
}

fn default_phone_fields() -> Vec<String> {
    vec![
        fields::MOBILE_PHONE.to_string(),
        fields::DIRECT_PHONE.to_string(),
    ]
}

fn default_contact_methods() -> Vec<ContactMethodEntry> {
    [
        ("Personal Emails", fields::PERSONAL_EMAIL),
        ("Business Emails", fields::BUSINESS_EMAIL),
        ("Mobile Numbers", fields::MOBILE_PHONE),
        ("Direct Numbers", fields::DIRECT_PHONE),
        ("LinkedIn Profiles", fields::LINKEDIN_URL),
    ]
    .into_iter()
    .map(|(label, field)| ContactMethodEntry {
        label: label.to_string(),
        field: field.to_string(),
    })
    .collect()
}

fn default_demographics() -> Vec<ChartEntry> {
    use RankingPolicy::{FallbackLast, FrequencyDescending};

    vec![
        ChartEntry::new("City Distribution", fields::PERSONAL_CITY, FrequencyDescending),
        ChartEntry::new("Age Range Distribution", fields::AGE_RANGE, FallbackLast),
        ChartEntry::new("Income Range Distribution", fields::INCOME_RANGE, FallbackLast),
        ChartEntry::new("Credit Rating Distribution", fields::CREDIT_RATING, FallbackLast),
        ChartEntry::new("Net Worth Distribution", fields::NET_WORTH, FallbackLast),
        ChartEntry::new("Gender Distribution", fields::GENDER, FallbackLast),
    ]
}

fn default_status() -> Vec<ChartEntry> {
    use RankingPolicy::FallbackLast;

    vec![
        ChartEntry::new("Parental Status", fields::CHILDREN, FallbackLast),
        ChartEntry::new("Homeownership Status", fields::HOMEOWNER, FallbackLast),
        ChartEntry::new("Marital Status", fields::MARRIED, FallbackLast),
    ]
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Colours handed out to chart buckets in order, wrapping around.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Include the contact method section.
    #[serde(default = "default_true")]
    pub include_contact_methods: bool,

    /// Include the status charts.
    #[serde(default = "default_true")]
    pub include_status: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            include_contact_methods: true,
            include_status: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_palette() -> Vec<String> {
    vec![
        "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#6366F1",
    ]
    .into_iter()
    .map(String::from)
    .collect()
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(delimiter) = args.delimiter {
            self.source.delimiter = delimiter;
        }

        if let Some(top_titles) = args.top_titles {
            self.dashboard.top_titles = top_titles;
        }
        if let Some(ref title_field) = args.title_field {
            self.dashboard.title_field = title_field.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level for this run. `--quiet` wins over a configured `verbose`.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fields.default_fallback, "Not Specified");
        assert_eq!(config.dashboard.top_titles, 5);
        assert_eq!(config.dashboard.title_field, "JOB_TITLE");
        assert_eq!(config.source.delimiter, ',');
        assert_eq!(config.dashboard.contact_method.len(), 5);
        assert_eq!(config.dashboard.demographics.len(), 6);
        assert_eq!(config.dashboard.status.len(), 3);
        assert!(config.fields.field.is_empty());

        let effective = config.fields.effective_entries();
        assert_eq!(effective.len(), 2);
        assert!(effective
            .iter()
            .all(|f| f.currency && (f.name == "INCOME_RANGE" || f.name == "NET_WORTH")));
    }

    #[test]
    fn test_city_chart_uses_frequency_ranking() {
        let config = Config::default();
        let city = &config.dashboard.demographics[0];
        assert_eq!(city.field, "PERSONAL_CITY");
        assert_eq!(city.policy, RankingPolicy::FrequencyDescending);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[source]
delimiter = ";"

[fields]
default_fallback = "Unknown"

[[fields.field]]
name = "SALARY"
currency = true
fallback_label = "Not Disclosed"

[dashboard]
top_titles = 3
title_field = "TITLE"

[[dashboard.demographics]]
title = "Region"
field = "REGION"
policy = "frequency_descending"

[[dashboard.demographics]]
title = "Gender"
field = "GENDER"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.source.delimiter, ';');
        assert_eq!(config.fields.default_fallback, "Unknown");
        assert_eq!(config.fields.field.len(), 1);
        assert_eq!(
            config.fields.field[0].fallback_label.as_deref(),
            Some("Not Disclosed")
        );
        assert_eq!(config.dashboard.top_titles, 3);
        assert_eq!(config.dashboard.title_field, "TITLE");
        assert_eq!(config.dashboard.demographics.len(), 2);
        assert_eq!(
            config.dashboard.demographics[0].policy,
            RankingPolicy::FrequencyDescending
        );
        assert_eq!(
            config.dashboard.demographics[1].policy,
            RankingPolicy::FallbackLast
        );
        // Untouched sections keep their defaults.
        assert_eq!(config.dashboard.status.len(), 3);
        assert!(config.report.include_status);
    }

    #[test]
    fn test_user_fields_layer_over_builtin_currency_fields() {
        let toml_content = r#"
[[fields.field]]
name = "SALARY"
currency = true

[[fields.field]]
name = "INCOME_RANGE"
currency = false
fallback_label = "Undisclosed"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        let effective = config.fields.effective_entries();

        assert_eq!(effective.len(), 3);
        let by_name = |name: &str| effective.iter().find(|e| e.name == name).unwrap();
        assert!(by_name("NET_WORTH").currency);
        assert!(by_name("SALARY").currency);
        assert!(!by_name("INCOME_RANGE").currency);
        assert_eq!(
            by_name("INCOME_RANGE").fallback_label.as_deref(),
            Some("Undisclosed")
        );
    }

    #[test]
    fn test_log_level_from_config() {
        let mut config = Config::default();
        assert_eq!(config.log_level(false), tracing::Level::INFO);

        config.general.verbose = true;
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);

        let parsed: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(parsed.log_level(false), tracing::Level::DEBUG);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[fields]"));
        assert!(toml_str.contains("[[dashboard.demographics]]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.dashboard.demographics.len(), 6);
    }
}
