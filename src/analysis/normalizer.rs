//! Field value normalization.
//!
//! Every raw cell passes through here before it is counted. Missing or blank
//! values collapse into a per-field fallback label, and currency columns lose
//! their `$` and thousands separators so `"$1,234"` and `"1234"` land in the
//! same bucket.

use crate::models::{fields, Record};
use std::collections::HashMap;

/// Label used for missing values unless a field overrides it.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Characters removed from currency-like values.
const CURRENCY_NOISE: [char; 2] = ['$', ','];

/// Static normalization rules for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Strip `$` and `,` before trimming.
    pub currency: bool,
    /// Substituted for absent or blank values.
    pub fallback_label: String,
}

impl FieldSpec {
    pub fn plain(fallback_label: impl Into<String>) -> Self {
        Self {
            currency: false,
            fallback_label: fallback_label.into(),
        }
    }

    pub fn currency(fallback_label: impl Into<String>) -> Self {
        Self {
            currency: true,
            fallback_label: fallback_label.into(),
        }
    }

    /// Normalize a single raw value according to this spec.
    pub fn normalize(&self, raw: Option<&str>) -> String {
        let raw = raw.unwrap_or("");

        let cleaned = if self.currency {
            raw.replace(CURRENCY_NOISE, "")
        } else {
            raw.to_string()
        };

        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            self.fallback_label.clone()
        } else {
            trimmed.to_string()
        }
    }
}

/// Lookup table from column name to its normalization rules.
///
/// Columns that are not listed fall back to a plain spec with the table's
/// default label, so unknown fields behave like a column that is always empty
/// or always free text.
#[derive(Debug, Clone)]
pub struct FieldTable {
    specs: HashMap<String, FieldSpec>,
    default: FieldSpec,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new(NOT_SPECIFIED)
            .with_spec(fields::INCOME_RANGE, FieldSpec::currency(NOT_SPECIFIED))
            .with_spec(fields::NET_WORTH, FieldSpec::currency(NOT_SPECIFIED))
    }
}

impl FieldTable {
    /// Create an empty table where every column is plain text.
    pub fn new(default_fallback: impl Into<String>) -> Self {
        Self {
            specs: HashMap::new(),
            default: FieldSpec::plain(default_fallback),
        }
    }

    /// Register (or replace) the rules for a column.
    pub fn with_spec(mut self, field: impl Into<String>, spec: FieldSpec) -> Self {
        self.specs.insert(field.into(), spec);
        self
    }

    /// Rules that apply to `field`.
    pub fn spec(&self, field: &str) -> &FieldSpec {
        self.specs.get(field).unwrap_or(&self.default)
    }

    /// The fallback label a field's blanks are counted under.
    pub fn fallback_label(&self, field: &str) -> &str {
        &self.spec(field).fallback_label
    }

    /// Whether a field is flagged as currency-like.
    pub fn is_currency(&self, field: &str) -> bool {
        self.spec(field).currency
    }

    /// Display-ready value of `field` for one record.
    pub fn normalize(&self, record: &Record, field: &str) -> String {
        self.spec(field).normalize(record.get(field))
    }
}

impl From<&crate::config::FieldsConfig> for FieldTable {
    fn from(config: &crate::config::FieldsConfig) -> Self {
        config
            .effective_entries()
            .into_iter()
            .fold(Self::new(config.default_fallback.clone()), |table, entry| {
                let label = entry
                    .fallback_label
                    .unwrap_or_else(|| config.default_fallback.clone());
                let spec = FieldSpec {
                    currency: entry.currency,
                    fallback_label: label,
                };
                table.with_spec(entry.name, spec)
            })
    }
}
