//! Coverage and distinct-value statistics.

use crate::models::Record;
use std::collections::HashSet;

/// Integer percentage of `count` over `total`, rounded half-up.
///
/// A zero `total` yields 0 rather than dividing by zero.
pub fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    let count = count.min(total) as u128;
    let total = total as u128;
    ((count * 200 + total) / (total * 2)) as u8
}

/// Number of records where at least one of `fields` is non-blank.
pub fn count_present(records: &[Record], fields: &[&str]) -> usize {
    records
        .iter()
        .filter(|record| fields.iter().any(|field| record.has_value(field)))
        .count()
}

/// Percentage of records where at least one of `fields` is non-blank.
pub fn coverage(records: &[Record], fields: &[&str]) -> u8 {
    percentage(count_present(records, fields), records.len())
}

/// Number of distinct non-blank trimmed values of `field`.
///
/// Blank and missing values are ignored rather than counted as a fallback
/// category.
pub fn distinct_count(records: &[Record], field: &str) -> usize {
    records
        .iter()
        .filter_map(|record| record.get(field))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields;

    fn records_with(field: &str, values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::new().with(field, *v))
            .collect()
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_mobile_phone_coverage() {
        let records = records_with(fields::MOBILE_PHONE, &["555-1212", "", "555-3434"]);
        assert_eq!(coverage(&records, &[fields::MOBILE_PHONE]), 67);
    }

    #[test]
    fn test_coverage_empty_record_set() {
        assert_eq!(coverage(&[], &[fields::MOBILE_PHONE]), 0);
    }

    #[test]
    fn test_coverage_any_field_counts() {
        let records = vec![
            Record::new().with(fields::PERSONAL_EMAIL, "a@example.com"),
            Record::new().with(fields::BUSINESS_EMAIL, "b@example.com"),
            Record::new()
                .with(fields::PERSONAL_EMAIL, "c@example.com")
                .with(fields::BUSINESS_EMAIL, "c@corp.example"),
            Record::new().with(fields::PERSONAL_EMAIL, " "),
        ];

        let email = [fields::PERSONAL_EMAIL, fields::BUSINESS_EMAIL];
        assert_eq!(count_present(&records, &email), 3);
        assert_eq!(coverage(&records, &email), 75);
    }

    #[test]
    fn test_coverage_unknown_field() {
        let records = records_with(fields::MOBILE_PHONE, &["555-1212"]);
        assert_eq!(coverage(&records, &["FAX"]), 0);
        assert_eq!(coverage(&records, &[]), 0);
    }

    #[test]
    fn test_distinct_count_skips_blanks() {
        let records = records_with(fields::PERSONAL_CITY, &["NYC", "", "NYC"]);
        assert_eq!(distinct_count(&records, fields::PERSONAL_CITY), 1);
    }

    #[test]
    fn test_distinct_count_trims() {
        let records = records_with(fields::PERSONAL_CITY, &["Austin", " Austin ", "Dallas"]);
        assert_eq!(distinct_count(&records, fields::PERSONAL_CITY), 2);
        assert_eq!(distinct_count(&[], fields::PERSONAL_CITY), 0);
    }
}
