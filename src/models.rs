//! Data models for contact analytics.
//!
//! This module contains the record representation handed over by the row
//! source and every structure the engine produces for the report layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Well-known contact list column names.
pub mod fields {
    pub const PERSONAL_CITY: &str = "PERSONAL_CITY";
    #[allow(dead_code)] // Known column, not charted by default
    pub const PERSONAL_ZIP: &str = "PERSONAL_ZIP";
    pub const AGE_RANGE: &str = "AGE_RANGE";
    pub const CHILDREN: &str = "CHILDREN";
    pub const GENDER: &str = "GENDER";
    pub const HOMEOWNER: &str = "HOMEOWNER";
    pub const MARRIED: &str = "MARRIED";
    pub const NET_WORTH: &str = "NET_WORTH";
    pub const INCOME_RANGE: &str = "INCOME_RANGE";
    pub const CREDIT_RATING: &str = "SKIPTRACE_CREDIT_RATING";
    pub const PERSONAL_EMAIL: &str = "PERSONAL_EMAIL";
    pub const BUSINESS_EMAIL: &str = "BUSINESS_EMAIL";
    pub const MOBILE_PHONE: &str = "MOBILE_PHONE";
    pub const DIRECT_PHONE: &str = "DIRECT_PHONE";
    pub const LINKEDIN_URL: &str = "LINKEDIN_URL";
    pub const JOB_TITLE: &str = "JOB_TITLE";
}

/// One row of input data, keyed by column name.
///
/// Values are stored exactly as the row source produced them. A missing key
/// and an empty string are both treated as "no value" by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    #[allow(dead_code)] // Fixture construction
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly useful for constructing fixtures.
    #[allow(dead_code)] // Fixture construction
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Returns the raw value for a field, if the column exists for this row.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// True when the field holds something other than whitespace.
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Number of columns present on this row.
    #[allow(dead_code)] // Used by row source tests
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row carries no columns at all.
    #[allow(dead_code)] // Used by row source tests
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A normalized value and the number of records that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// One row of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: usize,
}

impl RankedEntry {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// How aggregated buckets are ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Keep encounter order, but always put the fallback bucket last.
    #[default]
    FallbackLast,
    /// Highest counts first, truncated to the top buckets.
    FrequencyDescending,
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingPolicy::FallbackLast => write!(f, "fallback last"),
            RankingPolicy::FrequencyDescending => write!(f, "frequency descending"),
        }
    }
}

/// An ordered, display-ready distribution of one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    /// Chart title, e.g. "Gender Distribution".
    pub title: String,
    /// Column the distribution was computed over.
    pub field: String,
    /// Policy used to order the buckets.
    pub policy: RankingPolicy,
    /// Number of records in the set the buckets were drawn from.
    pub total: usize,
    /// Buckets in display order.
    pub buckets: Vec<Bucket>,
}

impl Distribution {
    /// Sum of the counts that made it into the display (may be below `total`
    /// after truncation).
    pub fn shown(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Headline numbers for the overview cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStats {
    pub total_contacts: usize,
    pub unique_cities: usize,
    pub email_coverage: u8,
    pub phone_coverage: u8,
}

/// Availability of a single contact channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethod {
    /// Display label, e.g. "Mobile Numbers".
    pub label: String,
    pub field: String,
    /// Records with a non-empty value for `field`.
    pub count: usize,
    pub total: usize,
    pub percentage: u8,
}

/// Information about how the dashboard was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Where the records came from (usually a file path).
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub duration_seconds: f64,
}

/// The complete set of results derived from one record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub stats: ContactStats,
    pub contact_methods: Vec<ContactMethod>,
    /// Field the top titles were ranked over.
    pub title_field: String,
    pub top_titles: Vec<RankedEntry>,
    pub demographics: Vec<Distribution>,
    pub status: Vec<Distribution>,
}
