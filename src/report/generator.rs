//! Dashboard report generation.
//!
//! This module renders a computed [`Dashboard`] as a Markdown document or as
//! JSON with chart-ready label/data/colour arrays.

use crate::analysis::coverage::percentage;
use crate::analysis::normalizer::FieldTable;
use crate::config::ReportConfig;
use crate::models::{
    ContactMethod, ContactStats, Dashboard, DashboardMetadata, Distribution, RankedEntry,
};
use anyhow::Result;
use serde::Serialize;

const BAR_WIDTH: usize = 20;

/// Chart-ready view of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<usize>,
    pub colors: Vec<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    charts: Vec<ChartData>,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    dashboard: &Dashboard,
    config: &ReportConfig,
    table: &FieldTable,
) -> String {
    let mut output = String::new();

    output.push_str("# Contact List Analytics\n\n");
    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_table_of_contents(config));
    output.push_str(&generate_overview_section(&dashboard.stats));

    if config.include_contact_methods {
        output.push_str(&generate_contact_methods_section(&dashboard.contact_methods));
    }

    output.push_str(&generate_top_titles_section(
        &dashboard.title_field,
        &dashboard.top_titles,
    ));
    output.push_str(&generate_distributions_section(
        "Demographics",
        &dashboard.demographics,
        table,
    ));

    if config.include_status {
        output.push_str(&generate_distributions_section(
            "Status Information",
            &dashboard.status,
            table,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.total_records));
    section.push_str(&format!(
        "- **Computation Time:** {:.3}s\n\n",
        metadata.duration_seconds
    ));

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(config: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Overview](#overview)\n");
    if config.include_contact_methods {
        toc.push_str("- [Contact Methods](#contact-methods)\n");
    }
    toc.push_str("- [Top Job Titles](#top-job-titles)\n");
    toc.push_str("- [Demographics](#demographics)\n");
    if config.include_status {
        toc.push_str("- [Status Information](#status-information)\n");
    }
    toc.push('\n');

    toc
}

/// Generate the overview cards.
fn generate_overview_section(stats: &ContactStats) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Total Contacts | Unique Cities | Email Coverage | Phone Coverage |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {}% | {}% |\n\n",
        stats.total_contacts, stats.unique_cities, stats.email_coverage, stats.phone_coverage
    ));

    section
}

/// Generate the contact methods section.
fn generate_contact_methods_section(methods: &[ContactMethod]) -> String {
    let mut section = String::new();

    section.push_str("## Contact Methods\n\n");

    if methods.is_empty() {
        section.push_str("No contact methods configured.\n\n");
        return section;
    }

    section.push_str("| Method | Available | Coverage | |\n");
    section.push_str("|:---|---:|---:|:---|\n");

    for method in methods {
        section.push_str(&format!(
            "| {} | {} of {} | {}% | `{}` |\n",
            method.label,
            method.count,
            method.total,
            method.percentage,
            bar(method.percentage)
        ));
    }
    section.push('\n');

    section
}

/// Generate the ranked job title list.
fn generate_top_titles_section(field: &str, titles: &[RankedEntry]) -> String {
    let mut section = String::new();

    section.push_str("## Top Job Titles\n\n");

    // Bars are relative to the leader, not to the record count.
    let Some(leader) = titles.first() else {
        section.push_str(&format!("No values found for `{}`.\n\n", field));
        return section;
    };

    section.push_str("| # | Title | Count | |\n");
    section.push_str("|---:|:---|---:|:---|\n");

    for (i, entry) in titles.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            i + 1,
            escape_cell(&entry.name),
            entry.count,
            bar(percentage(entry.count, leader.count))
        ));
    }
    section.push('\n');

    section
}

/// Generate one group of distribution tables.
fn generate_distributions_section(
    heading: &str,
    distributions: &[Distribution],
    table: &FieldTable,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", heading));

    for dist in distributions {
        section.push_str(&generate_distribution_table(dist, table));
    }

    section
}

/// Generate the table for a single distribution.
fn generate_distribution_table(dist: &Distribution, table: &FieldTable) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", dist.title));

    if dist.buckets.is_empty() {
        block.push_str("*No records.*\n\n");
        return block;
    }

    let currency = table.is_currency(&dist.field);

    block.push_str("| Value | Count | Share |\n");
    block.push_str("|:---|---:|---:|\n");

    for bucket in &dist.buckets {
        let label = match currency.then(|| currency_label(&bucket.label)).flatten() {
            Some(pretty) => format!("{} ({})", pretty, escape_cell(&bucket.label)),
            None => escape_cell(&bucket.label),
        };

        block.push_str(&format!(
            "| {} | {} | {}% |\n",
            label,
            bucket.count,
            percentage(bucket.count, dist.total)
        ));
    }

    let shown = dist.shown();
    if shown < dist.total {
        block.push_str(&format!(
            "\n*Top {} values shown, covering {} of {} records.*\n",
            dist.buckets.len(),
            shown,
            dist.total
        ));
    }
    block.push('\n');

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by contact-analytics v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
///
/// The dashboard is serialized as-is, plus a `charts` array with one entry
/// per chart, each bucket paired with a palette colour.
pub fn generate_json_report(dashboard: &Dashboard, config: &ReportConfig) -> Result<String> {
    let mut charts = Vec::new();

    if config.include_contact_methods {
        charts.push(contact_methods_chart(&dashboard.contact_methods, &config.palette));
    }
    charts.extend(
        dashboard
            .demographics
            .iter()
            .map(|d| chart_data(d, &config.palette)),
    );
    if config.include_status {
        charts.extend(dashboard.status.iter().map(|d| chart_data(d, &config.palette)));
    }

    let report = JsonReport { dashboard, charts };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Turn a distribution into parallel label/data/colour arrays.
pub fn chart_data(dist: &Distribution, palette: &[String]) -> ChartData {
    ChartData {
        title: dist.title.clone(),
        labels: dist.buckets.iter().map(|b| b.label.clone()).collect(),
        data: dist.buckets.iter().map(|b| b.count).collect(),
        colors: assign_colors(dist.buckets.len(), palette),
    }
}

fn contact_methods_chart(methods: &[ContactMethod], palette: &[String]) -> ChartData {
    ChartData {
        title: "Available Contact Methods".to_string(),
        labels: methods.iter().map(|m| m.label.clone()).collect(),
        data: methods.iter().map(|m| m.count).collect(),
        colors: assign_colors(methods.len(), palette),
    }
}

/// Cycle through `palette` to colour `count` items.
pub fn assign_colors(count: usize, palette: &[String]) -> Vec<String> {
    if palette.is_empty() {
        return Vec::new();
    }

    palette.iter().cycle().take(count).cloned().collect()
}

/// Compact dollar amount: `$950`, `$45.0k`, `$1.2M`.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}k", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Pretty-print a normalized currency label such as `45000-54999` or
/// `250000+`. Returns `None` for anything that is not numeric.
pub fn currency_label(label: &str) -> Option<String> {
    let parts = label
        .split('-')
        .map(|part| currency_part(part.trim()))
        .collect::<Option<Vec<_>>>()?;

    Some(parts.join(" - "))
}

fn currency_part(part: &str) -> Option<String> {
    let (number, suffix) = match part.strip_suffix('+') {
        Some(number) => (number.trim(), "+"),
        None => (part, ""),
    };

    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(format!("{}{}", format_currency(value), suffix))
}

/// Text progress bar for a percentage.
fn bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fields, Bucket, RankingPolicy};
    use chrono::Utc;

    fn create_test_dashboard() -> Dashboard {
        Dashboard {
            metadata: DashboardMetadata {
                source: "contacts.csv".to_string(),
                generated_at: Utc::now(),
                total_records: 10,
                duration_seconds: 0.01,
            },
            stats: ContactStats {
                total_contacts: 10,
                unique_cities: 3,
                email_coverage: 80,
                phone_coverage: 40,
            },
            contact_methods: vec![ContactMethod {
                label: "Mobile Numbers".to_string(),
                field: fields::MOBILE_PHONE.to_string(),
                count: 4,
                total: 10,
                percentage: 40,
            }],
            title_field: fields::JOB_TITLE.to_string(),
            top_titles: vec![RankedEntry::new("Engineer", 4), RankedEntry::new("Sales", 2)],
            demographics: vec![
                Distribution {
                    title: "City Distribution".to_string(),
                    field: fields::PERSONAL_CITY.to_string(),
                    policy: RankingPolicy::FrequencyDescending,
                    total: 10,
                    buckets: vec![Bucket::new("Austin", 5), Bucket::new("Dallas", 3)],
                },
                Distribution {
                    title: "Income Range Distribution".to_string(),
                    field: fields::INCOME_RANGE.to_string(),
                    policy: RankingPolicy::FallbackLast,
                    total: 10,
                    buckets: vec![
                        Bucket::new("45000-54999", 6),
                        Bucket::new("Not Specified", 4),
                    ],
                },
            ],
            status: vec![Distribution {
                title: "Marital Status".to_string(),
                field: fields::MARRIED.to_string(),
                policy: RankingPolicy::FallbackLast,
                total: 10,
                buckets: vec![Bucket::new("Y", 7), Bucket::new("Not Specified", 3)],
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let dashboard = create_test_dashboard();
        let markdown =
            generate_markdown_report(&dashboard, &ReportConfig::default(), &FieldTable::default());

        assert!(markdown.contains("# Contact List Analytics"));
        assert!(markdown.contains("## Overview"));
        assert!(markdown.contains("| 10 | 3 | 80% | 40% |"));
        assert!(markdown.contains("## Contact Methods"));
        assert!(markdown.contains("## Top Job Titles"));
        assert!(markdown.contains("| 1 | Engineer | 4 |"));
        assert!(markdown.contains("### City Distribution"));
        assert!(markdown.contains("## Status Information"));
        assert!(markdown.contains("Top 2 values shown, covering 8 of 10 records"));
    }

    #[test]
    fn test_markdown_currency_labels() {
        let dashboard = create_test_dashboard();
        let markdown =
            generate_markdown_report(&dashboard, &ReportConfig::default(), &FieldTable::default());

        assert!(markdown.contains("| $45.0k - $55.0k (45000-54999) | 6 | 60% |"));
        assert!(markdown.contains("| Not Specified | 4 | 40% |"));
    }

    #[test]
    fn test_markdown_sections_can_be_disabled() {
        let dashboard = create_test_dashboard();
        let config = ReportConfig {
            include_contact_methods: false,
            include_status: false,
            ..ReportConfig::default()
        };
        let markdown = generate_markdown_report(&dashboard, &config, &FieldTable::default());

        assert!(!markdown.contains("## Contact Methods"));
        assert!(!markdown.contains("## Status Information"));
    }

    #[test]
    fn test_top_titles_empty() {
        let section = generate_top_titles_section("JOB_TITLE", &[]);
        assert!(section.contains("No values found for `JOB_TITLE`"));
    }

    #[test]
    fn test_generate_json_report() {
        let dashboard = create_test_dashboard();
        let json = generate_json_report(&dashboard, &ReportConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["stats"]["email_coverage"], 80);
        assert_eq!(value["top_titles"][0]["name"], "Engineer");
        assert_eq!(value["demographics"][0]["policy"], "frequency_descending");
        // contact methods + 2 demographics + 1 status
        assert_eq!(value["charts"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["charts"][1]["labels"][0], "Austin");
        assert_eq!(value["charts"][1]["colors"][0], "#3B82F6");
    }

    #[test]
    fn test_assign_colors_cycles() {
        let palette = vec!["#111".to_string(), "#222".to_string()];
        assert_eq!(assign_colors(3, &palette), vec!["#111", "#222", "#111"]);
        assert!(assign_colors(3, &[]).is_empty());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(45_000.0), "$45.0k");
        assert_eq!(format_currency(1_340_000.0), "$1.3M");
    }

    #[test]
    fn test_currency_label() {
        assert_eq!(
            currency_label("45000-54999").as_deref(),
            Some("$45.0k - $55.0k")
        );
        assert_eq!(currency_label("250000+").as_deref(), Some("$250.0k+"));
        assert_eq!(currency_label("Not Specified"), None);
        assert_eq!(currency_label("-5"), None);
        assert_eq!(currency_label("inf"), None);
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(100), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
    }
}
