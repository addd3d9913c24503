//! End-to-end pipeline tests: raw headers in, export rows out.

use contactlog_core::{
    EmailRecord, FilterList, FilterReason, bad_format_table, classify, filtered_table, valid_table,
};
use proptest::prelude::*;

fn build(subject: &str, from: &str, to: &str, date: &str) -> EmailRecord {
    EmailRecord::build(subject, from, to, date)
}

#[test]
fn test_blocked_address_lands_in_filtered_export() {
    let mut list = FilterList::default();
    list.emails.insert("alice@bad.com".to_string());

    let records = vec![build(
        "Hi",
        "alice@bad.com",
        "bob@x.com",
        "Mon, 2 Jan 2023 10:00:00 +0000",
    )];
    let result = classify(records, 2023, Some(&list));

    assert!(result.valid.is_empty());
    assert_eq!(result.filtered.len(), 1);
    assert_eq!(
        result.filtered[0].verdict.reason(),
        Some(FilterReason::Email)
    );

    let table = filtered_table(&result.exported_filtered());
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][5], "Email address in filter list");
    assert_eq!(table.rows[0][6], "alice@bad.com");
}

#[test]
fn test_wrong_year_suppressed_from_export_but_counted() {
    let records = vec![build(
        "Hi",
        "alice@bad.com",
        "bob@x.com",
        "Mon, 2 Jan 2023 10:00:00 +0000",
    )];
    let result = classify(records, 2022, None);

    assert_eq!(result.filtered.len(), 1);
    assert_eq!(
        result.filtered[0].verdict.reason(),
        Some(FilterReason::IncorrectYear)
    );
    assert_eq!(result.filtered[0].verdict.value(), Some("2023"));
    assert!(result.exported_filtered().is_empty());
    assert_eq!(result.total(), 1);
}

#[test]
fn test_unparseable_date_preserved_verbatim() {
    let raw_date = "the 2nd of January, probably";
    let records = vec![build("Hi", "alice@x.com", "bob@x.com", raw_date)];
    let result = classify(records, 2023, None);

    assert_eq!(result.bad_format.len(), 1);
    let table = bad_format_table(&result.bad_format);
    assert_eq!(table.rows, [["Incorrect Date Format", raw_date]]);
}

#[test]
fn test_decoded_subject_flows_to_valid_rows() {
    let records = vec![build(
        "=?utf-8?Q?caf=C3=A9_plans?=",
        "Alice <alice@x.com>",
        "bob@x.com",
        "Mon, 2 Jan 2023 10:00:00 +0000",
    )];
    let result = classify(records, 2023, None);

    let table = valid_table(&result.valid, false);
    assert_eq!(
        table.rows,
        [["café plans", "Alice", "alice@x.com", "bob@x.com", "1/2/23"]]
    );
}

/// A date the no-weekday grammar accepts, so arbitrary day/month values do
/// not trip weekday validation.
fn date_string(month: u32, day: u32, hour: u32) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    format!(
        "{day} {} 2023 {hour}:00:00 +0000",
        MONTHS[(month - 1) as usize]
    )
}

proptest! {
    #[test]
    fn prop_valid_bucket_is_chronological(
        dates in prop::collection::vec((1u32..=12, 1u32..=28, 0u32..=23), 0..40)
    ) {
        let records: Vec<EmailRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, &(month, day, hour))| {
                build(
                    "Hi",
                    &format!("sender{i}@x.com"),
                    "bob@x.com",
                    &date_string(month, day, hour),
                )
            })
            .collect();

        let result = classify(records, 2023, None);
        prop_assert_eq!(result.valid.len(), dates.len());
        for pair in result.valid.windows(2) {
            prop_assert!(pair[0].parsed_date() <= pair[1].parsed_date());
        }
    }

    #[test]
    fn prop_classification_is_idempotent(
        dates in prop::collection::vec((1u32..=12, 1u32..=28, 0u32..=23), 0..20)
    ) {
        let records: Vec<EmailRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, &(month, day, hour))| {
                build(
                    "Hi",
                    &format!("sender{i}@x.com"),
                    "bob@x.com",
                    &date_string(month, day, hour),
                )
            })
            .collect();

        let first = classify(records.clone(), 2023, None);
        let second = classify(records, 2023, None);

        let emails = |bucket: &[EmailRecord]| {
            bucket.iter().map(|r| r.from_email.clone()).collect::<Vec<_>>()
        };
        prop_assert_eq!(emails(&first.valid), emails(&second.valid));
        prop_assert_eq!(emails(&first.filtered), emails(&second.filtered));
        prop_assert_eq!(emails(&first.bad_format), emails(&second.bad_format));
    }
}
