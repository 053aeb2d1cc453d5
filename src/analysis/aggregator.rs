//! Frequency aggregation and ranking.
//!
//! This module groups records by a normalized field value, orders the
//! resulting buckets for display, and ranks free-text columns by frequency.

use crate::analysis::normalizer::FieldTable;
use crate::models::{Bucket, RankedEntry, RankingPolicy, Record};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Maximum number of buckets kept by [`RankingPolicy::FrequencyDescending`].
pub const TOP_BUCKET_LIMIT: usize = 10;

/// Count every record under its normalized value for `field`.
///
/// Each record contributes to exactly one bucket, so the counts always sum to
/// `records.len()`. Buckets come back in first-encountered order, which is the
/// tie-breaker the ranking functions rely on.
pub fn count_values(records: &[Record], field: &str, table: &FieldTable) -> Vec<Bucket> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for record in records {
        let label = table.normalize(record, field);

        match index.get(&label) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push(Bucket::new(label, 1));
            }
        }
    }

    debug!(
        "Aggregated {} records of {} into {} buckets",
        records.len(),
        field,
        buckets.len()
    );

    buckets
}

/// Order buckets for display according to `policy`.
pub fn rank_buckets(
    mut buckets: Vec<Bucket>,
    policy: RankingPolicy,
    fallback_label: &str,
) -> Vec<Bucket> {
    match policy {
        RankingPolicy::FallbackLast => {
            // Stable, so real categories keep their relative order.
            buckets.sort_by_key(|b| b.label == fallback_label);
        }
        RankingPolicy::FrequencyDescending => {
            buckets.sort_by_key(|b| Reverse(b.count));
            buckets.truncate(TOP_BUCKET_LIMIT);
        }
    }

    buckets
}

/// Aggregate and rank one field in a single call.
pub fn distribution(
    records: &[Record],
    field: &str,
    table: &FieldTable,
    policy: RankingPolicy,
) -> Vec<Bucket> {
    let buckets = count_values(records, field, table);
    rank_buckets(buckets, policy, table.fallback_label(field))
}

/// The `limit` most frequent normalized values of `field`.
///
/// Counts are non-increasing and ties keep first-encountered order. Unlike
/// the fallback-last display policy, blanks are ranked by their natural
/// count here.
pub fn top_n(records: &[Record], field: &str, table: &FieldTable, limit: usize) -> Vec<RankedEntry> {
    if limit == 0 {
        return Vec::new();
    }

    let mut buckets = count_values(records, field, table);
    buckets.sort_by_key(|b| Reverse(b.count));
    buckets.truncate(limit);

    buckets
        .into_iter()
        .map(|b| RankedEntry::new(b.label, b.count))
        .collect()
}
