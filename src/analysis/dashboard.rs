//! Dashboard assembly.
//!
//! Runs every statistic configured for the dashboard over one record set and
//! collects the results into a single snapshot for the report layer.

use crate::analysis::aggregator::{distribution, top_n};
use crate::analysis::coverage::{count_present, coverage, distinct_count, percentage};
use crate::analysis::normalizer::FieldTable;
use crate::config::{ChartEntry, ContactMethodEntry, DashboardConfig};
use crate::models::{
    ContactMethod, ContactStats, Dashboard, DashboardMetadata, Distribution, Record,
};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

/// Headline numbers: totals, unique cities, email and phone coverage.
pub fn contact_stats(records: &[Record], config: &DashboardConfig) -> ContactStats {
    ContactStats {
        total_contacts: records.len(),
        unique_cities: distinct_count(records, &config.city_field),
        email_coverage: coverage(records, &as_strs(&config.email_fields)),
        phone_coverage: coverage(records, &as_strs(&config.phone_fields)),
    }
}

/// Per-channel availability for each configured contact method.
pub fn contact_methods(records: &[Record], entries: &[ContactMethodEntry]) -> Vec<ContactMethod> {
    let total = records.len();

    entries
        .iter()
        .map(|entry| {
            let count = count_present(records, &[entry.field.as_str()]);
            ContactMethod {
                label: entry.label.clone(),
                field: entry.field.clone(),
                count,
                total,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

/// Build one ranked distribution per chart entry.
pub fn distributions(
    records: &[Record],
    charts: &[ChartEntry],
    table: &FieldTable,
) -> Vec<Distribution> {
    charts
        .iter()
        .map(|chart| {
            let buckets = distribution(records, &chart.field, table, chart.policy);
            debug!(
                "{}: {} buckets ({})",
                chart.title,
                buckets.len(),
                chart.policy
            );

            Distribution {
                title: chart.title.clone(),
                field: chart.field.clone(),
                policy: chart.policy,
                total: records.len(),
                buckets,
            }
        })
        .collect()
}

/// Compute the full dashboard for a record set.
pub fn build_dashboard(
    records: &[Record],
    source: &str,
    config: &DashboardConfig,
    table: &FieldTable,
) -> Dashboard {
    let start = Instant::now();

    let stats = contact_stats(records, config);
    let methods = contact_methods(records, &config.contact_method);
    let top_titles = top_n(records, &config.title_field, table, config.top_titles);
    let demographics = distributions(records, &config.demographics, table);
    let status = distributions(records, &config.status, table);

    let duration = start.elapsed().as_secs_f64();
    info!(
        "Computed dashboard for {} records in {:.3}s",
        records.len(),
        duration
    );

    Dashboard {
        metadata: DashboardMetadata {
            source: source.to_string(),
            generated_at: Utc::now(),
            total_records: records.len(),
            duration_seconds: duration,
        },
        stats,
        contact_methods: methods,
        title_field: config.title_field.clone(),
        top_titles,
        demographics,
        status,
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
