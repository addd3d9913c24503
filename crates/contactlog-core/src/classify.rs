//! Partitioning of records into valid, bad-format, and filtered buckets.

use tracing::debug;

use crate::filter::{self, FilterList, FilterReason, FilterVerdict};
use crate::record::EmailRecord;

/// The three disjoint output buckets of one classification run.
#[derive(Debug, Default)]
pub struct Classification {
    /// Well-formed records from the target year that passed every filter,
    /// sorted ascending by date.
    pub valid: Vec<EmailRecord>,
    /// Records with an invalid date or headers, in encounter order.
    pub bad_format: Vec<EmailRecord>,
    /// Records excluded by year or block-list, sorted ascending by date.
    /// Includes suppressed reasons; see [`Classification::exported_filtered`].
    pub filtered: Vec<EmailRecord>,
}

impl Classification {
    /// The filtered records that actually appear in the filtered export:
    /// staff and wrong-year records are withheld (they still count toward
    /// totals).
    #[must_use]
    pub fn exported_filtered(&self) -> Vec<&EmailRecord> {
        self.filtered
            .iter()
            .filter(|record| {
                record
                    .verdict
                    .reason()
                    .is_none_or(|reason| !reason.suppressed())
            })
            .collect()
    }

    /// Total number of classified records across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid.len() + self.bad_format.len() + self.filtered.len()
    }
}

/// Classifies a batch of records.
///
/// Bucket assignment per record, in this precedence:
///
/// 1. invalid date or headers: bad-format, regardless of anything else;
/// 2. year differs from `year`: filtered, with the synthetic
///    "Incorrect Year" reason carrying the actual year — this wins over any
///    block-list match;
/// 3. block-list match (when `filters` is present): filtered, with the
///    engine's reason and value;
/// 4. otherwise: valid.
///
/// With `filters` absent every record passes by definition and only date,
/// header, and year checks apply.
#[must_use]
pub fn classify(
    records: Vec<EmailRecord>,
    year: i32,
    filters: Option<&FilterList>,
) -> Classification {
    let mut result = Classification::default();

    for record in records {
        if !record.valid_date() || !record.valid_headers {
            result.bad_format.push(record);
            continue;
        }
        if record.year() != Some(year) {
            let value = record.year().map(|y| y.to_string()).unwrap_or_default();
            result.filtered.push(record.with_verdict(FilterVerdict::Failed {
                reason: FilterReason::IncorrectYear,
                value,
            }));
            continue;
        }
        let verdict = filters.map_or(FilterVerdict::Passed, |list| filter::evaluate(&record, list));
        if verdict.is_failed() {
            result.filtered.push(record.with_verdict(verdict));
        } else {
            result.valid.push(record.with_verdict(FilterVerdict::Passed));
        }
    }

    // Chronological output order; bad-format has no reliable sort key and
    // keeps encounter order.
    result.valid.sort_by_key(EmailRecord::parsed_date);
    result.filtered.sort_by_key(EmailRecord::parsed_date);

    debug!(
        valid = result.valid.len(),
        bad_format = result.bad_format.len(),
        filtered = result.filtered.len(),
        "classified records"
    );

    result
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn record(from: &str, date: &str) -> EmailRecord {
        EmailRecord::build("Hi", from, "bob@x.com", date)
    }

    #[test]
    fn test_bad_format_beats_everything() {
        let mut list = FilterList::default();
        list.emails.insert("alice@bad.com".to_string());

        let records = vec![record("alice@bad.com", "not a date")];
        let result = classify(records, 2023, Some(&list));

        assert_eq!(result.bad_format.len(), 1);
        assert!(result.filtered.is_empty());
        // Bad-format records keep their unevaluated verdict
        assert_eq!(result.bad_format[0].verdict, FilterVerdict::Unknown);
    }

    #[test]
    fn test_year_mismatch_beats_filter_match() {
        let mut list = FilterList::default();
        list.emails.insert("alice@bad.com".to_string());

        let records = vec![record("alice@bad.com", "Mon, 2 Jan 2023 10:00:00 +0000")];
        let result = classify(records, 2022, Some(&list));

        assert_eq!(result.filtered.len(), 1);
        assert_eq!(
            result.filtered[0].verdict.reason(),
            Some(FilterReason::IncorrectYear)
        );
        assert_eq!(result.filtered[0].verdict.value(), Some("2023"));
        // Suppressed from the export, still counted
        assert!(result.exported_filtered().is_empty());
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_filter_match_lands_in_filtered() {
        let mut list = FilterList::default();
        list.emails.insert("alice@bad.com".to_string());

        let records = vec![record("alice@bad.com", "Mon, 2 Jan 2023 10:00:00 +0000")];
        let result = classify(records, 2023, Some(&list));

        assert_eq!(result.filtered.len(), 1);
        assert_eq!(result.filtered[0].verdict.reason(), Some(FilterReason::Email));
        assert_eq!(result.exported_filtered().len(), 1);
    }

    #[test]
    fn test_disabled_filtering_passes_everything() {
        let records = vec![record("alice@bad.com", "Mon, 2 Jan 2023 10:00:00 +0000")];
        let result = classify(records, 2023, None);

        assert_eq!(result.valid.len(), 1);
        assert_eq!(result.valid[0].verdict, FilterVerdict::Passed);
    }

    #[test]
    fn test_staff_suppressed_but_counted() {
        let mut list = FilterList::default();
        list.staff.insert("carol@org.example".to_string());

        let records = vec![record("carol@org.example", "Mon, 2 Jan 2023 10:00:00 +0000")];
        let result = classify(records, 2023, Some(&list));

        assert_eq!(result.filtered.len(), 1);
        assert_eq!(result.filtered[0].verdict.reason(), Some(FilterReason::Staff));
        assert!(result.exported_filtered().is_empty());
    }

    #[test]
    fn test_valid_bucket_sorted_by_date() {
        let records = vec![
            record("a@x.com", "Wed, 4 Jan 2023 10:00:00 +0000"),
            record("b@x.com", "Mon, 2 Jan 2023 10:00:00 +0000"),
            record("c@x.com", "Tue, 3 Jan 2023 10:00:00 +0000"),
        ];
        let result = classify(records, 2023, None);

        let order: Vec<_> = result
            .valid
            .iter()
            .map(|r| r.from_email.as_str())
            .collect();
        assert_eq!(order, ["b@x.com", "c@x.com", "a@x.com"]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("a@x.com", "Wed, 4 Jan 2023 10:00:00 +0000"),
            record("b@x.com", "bogus"),
            record("c@x.com", "Tue, 3 Jan 2022 10:00:00 +0000"),
        ];
        let first = classify(records.clone(), 2023, None);
        let second = classify(records, 2023, None);

        let emails = |bucket: &[EmailRecord]| {
            bucket.iter().map(|r| r.from_email.clone()).collect::<Vec<_>>()
        };
        assert_eq!(emails(&first.valid), emails(&second.valid));
        assert_eq!(emails(&first.bad_format), emails(&second.bad_format));
        assert_eq!(emails(&first.filtered), emails(&second.filtered));
    }
}
