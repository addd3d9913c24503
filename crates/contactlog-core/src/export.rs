//! Export-row production for the four output artifacts.
//!
//! This module decides what rows and header rows each artifact contains;
//! how the bytes are framed on disk is the writer's concern.

use std::collections::HashMap;

use crate::record::EmailRecord;

/// A header row plus data rows, ready for delimited-file writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column names.
    pub header: Vec<String>,
    /// Data rows, each as long as the header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }
}

/// Columns shared by the valid and filtered exports.
const RECORD_COLUMNS: [&str; 5] = ["Subject", "From Name", "From Email", "To", "Date"];

fn record_row(record: &EmailRecord) -> Vec<String> {
    vec![
        record.subject.clone(),
        record.from_name.clone(),
        record.from_email.clone(),
        record.to.clone(),
        record.us_date().unwrap_or_default(),
    ]
}

/// Rows for the valid-record export.
///
/// With `exclude_subject` set the Subject column is dropped entirely,
/// header included.
#[must_use]
pub fn valid_table(records: &[EmailRecord], exclude_subject: bool) -> Table {
    let mut table = Table::new(&RECORD_COLUMNS);
    table.rows = records.iter().map(record_row).collect();
    if exclude_subject {
        table.header.remove(0);
        for row in &mut table.rows {
            row.remove(0);
        }
    }
    table
}

/// Rows for the filtered-record export: the record columns plus the filter
/// reason and matched value.
#[must_use]
pub fn filtered_table(records: &[&EmailRecord]) -> Table {
    let mut header = RECORD_COLUMNS.to_vec();
    header.push("Filter Reason");
    header.push("Filter Value");
    let mut table = Table::new(&header);
    table.rows = records
        .iter()
        .map(|record| {
            let mut row = record_row(record);
            row.push(
                record
                    .verdict
                    .reason()
                    .map(|reason| reason.as_str().to_string())
                    .unwrap_or_default(),
            );
            row.push(record.verdict.value().unwrap_or_default().to_string());
            row
        })
        .collect();
    table
}

/// Rows for the bad-format export.
///
/// A record contributes one row per violated invariant, so a message with
/// both an unparseable date and undecodable headers yields two rows.
#[must_use]
pub fn bad_format_table(records: &[EmailRecord]) -> Table {
    let mut table = Table::new(&["Format Error", "Raw Value"]);
    for record in records {
        if let Some(raw) = record.raw_date() {
            table.rows.push(vec![
                "Incorrect Date Format".to_string(),
                raw.to_string(),
            ]);
        }
        if let Some(blob) = record.header_blob() {
            table.rows.push(vec![
                "Incorrect Header Format".to_string(),
                blob.to_string(),
            ]);
        }
    }
    table
}

/// Filter statistics: filtered-record counts ranked by sender host and,
/// separately, by sender address.
///
/// Aggregates over the full filtered bucket, suppressed reasons included.
/// Rows are ordered by descending count, then key, so output is stable
/// across runs.
#[must_use]
pub fn stats_tables(filtered: &[EmailRecord]) -> (Table, Table) {
    let mut by_domain = Table::new(&["Domain", "Count"]);
    by_domain.rows = ranked_counts(filtered.iter().map(|r| r.from_host.as_str()));

    let mut by_email = Table::new(&["Email", "Count"]);
    by_email.rows = ranked_counts(filtered.iter().map(|r| r.from_email.as_str()));

    (by_domain, by_email)
}

fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<Vec<String>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        if key.is_empty() {
            continue;
        }
        *counts.entry(key).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .map(|(key, count)| vec![key.to_string(), count.to_string()])
        .collect()
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
    use crate::filter::{FilterReason, FilterVerdict};

    fn record(subject: &str, from: &str, date: &str) -> EmailRecord {
        EmailRecord::build(subject, from, "bob@x.com", date)
    }

    #[test]
    fn test_valid_table() {
        let records = vec![record(
            "Hi",
            "Alice <alice@example.com>",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        )];
        let table = valid_table(&records, false);

        assert_eq!(
            table.header,
            ["Subject", "From Name", "From Email", "To", "Date"]
        );
        assert_eq!(
            table.rows,
            [["Hi", "Alice", "alice@example.com", "bob@x.com", "1/2/23"]]
        );
    }

    #[test]
    fn test_valid_table_without_subject() {
        let records = vec![record(
            "Hi",
            "alice@example.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        )];
        let table = valid_table(&records, true);

        assert_eq!(table.header, ["From Name", "From Email", "To", "Date"]);
        assert_eq!(table.rows[0].len(), 4);
        assert!(!table.rows[0].contains(&"Hi".to_string()));
    }

    #[test]
    fn test_filtered_table_carries_reason_and_value() {
        let filtered = record(
            "Hi",
            "alice@bad.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        )
        .with_verdict(FilterVerdict::Failed {
            reason: FilterReason::Email,
            value: "alice@bad.com".to_string(),
        });
        let records = [&filtered];
        let table = filtered_table(&records);

        assert_eq!(table.header[5], "Filter Reason");
        assert_eq!(table.rows[0][5], "Email address in filter list");
        assert_eq!(table.rows[0][6], "alice@bad.com");
    }

    #[test]
    fn test_bad_format_rows_per_invariant() {
        let both_bad = record("=?utf-8?B?####?=", "alice@example.com", "whenever");
        let date_only = record("Hi", "alice@example.com", "later");
        let table = bad_format_table(&[both_bad, date_only]);

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "Incorrect Date Format");
        assert_eq!(table.rows[0][1], "whenever");
        assert_eq!(table.rows[1][0], "Incorrect Header Format");
        assert_eq!(table.rows[2], ["Incorrect Date Format", "later"]);
    }

    #[test]
    fn test_stats_ranked_descending_with_stable_ties() {
        let date = "Mon, 2 Jan 2023 10:00:00 +0000";
        let records = vec![
            record("Hi", "a@one.example", date),
            record("Hi", "b@one.example", date),
            record("Hi", "a@two.example", date),
        ];
        let (by_domain, by_email) = stats_tables(&records);

        assert_eq!(by_domain.rows[0], ["one.example", "2"]);
        assert_eq!(by_domain.rows[1], ["two.example", "1"]);
        // Tie on count falls back to key order
        assert_eq!(by_email.rows[0][0], "a@one.example");
        assert_eq!(by_email.rows.len(), 3);
    }
}
