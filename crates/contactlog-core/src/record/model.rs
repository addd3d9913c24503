//! The normalized email record model.

use chrono::{DateTime, Datelike, FixedOffset};
use contactlog_mime::{decode_header, parse_date, parse_sender};

use crate::filter::FilterVerdict;

/// Date field of a record.
///
/// Holds the raw text when no date grammar matched, so malformed records
/// surface the original value verbatim in the bad-format export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    /// Successfully parsed date.
    Parsed(DateTime<FixedOffset>),
    /// Raw header text; no grammar matched.
    Raw(String),
}

/// One normalized message from the archive.
///
/// Built once per input message by [`EmailRecord::build`] and never mutated
/// afterwards; the filter outcome is attached by value via
/// [`EmailRecord::with_verdict`]. Construction never fails: decoding and
/// parsing failures degrade to a flagged, best-effort record.
#[derive(Debug, Clone)]
pub struct EmailRecord {
    /// Decoded subject (raw text when decoding failed).
    pub subject: String,
    /// Sender display name; falls back to the whole decoded `From:` value
    /// when address parsing failed.
    pub from_name: String,
    /// Sender address; empty when address parsing failed.
    pub from_email: String,
    /// Sender host, lowercased; empty when address parsing failed.
    pub from_host: String,
    /// Decoded recipient value; may list several addresses, kept unparsed.
    pub to: String,
    /// Parsed or raw date.
    pub date: RecordDate,
    /// Whether every header decoded and the sender address parsed.
    pub valid_headers: bool,
    /// Filter outcome, `Unknown` until classification.
    pub verdict: FilterVerdict,
    /// Original undecoded header text, kept only for invalid records.
    raw_headers: Option<String>,
}

impl EmailRecord {
    /// Builds a record from the raw envelope headers of one message.
    #[must_use]
    pub fn build(subject: &str, from: &str, to: &str, date: &str) -> Self {
        let (decoded_subject, subject_ok) = decode_header(subject);
        let (decoded_to, to_ok) = decode_header(to);
        let (decoded_from, from_ok) = decode_header(from);

        let mut valid_headers = subject_ok && to_ok && from_ok;

        let (from_name, from_email, from_host) = match parse_sender(&decoded_from) {
            Ok(sender) => (sender.display_name, sender.email, sender.host),
            Err(_) => {
                valid_headers = false;
                (decoded_from, String::new(), String::new())
            }
        };

        let record_date = parse_date(date)
            .map_or_else(|| RecordDate::Raw(date.to_string()), RecordDate::Parsed);

        let raw_headers =
            (!valid_headers).then(|| format!("From: {from} | To: {to} | Subject: {subject}"));

        Self {
            subject: decoded_subject,
            from_name,
            from_email,
            from_host,
            to: decoded_to,
            date: record_date,
            valid_headers,
            verdict: FilterVerdict::Unknown,
            raw_headers,
        }
    }

    /// Attaches a filter verdict, consuming the record.
    #[must_use]
    pub fn with_verdict(mut self, verdict: FilterVerdict) -> Self {
        self.verdict = verdict;
        self
    }

    /// Whether the date header matched a known grammar.
    #[must_use]
    pub const fn valid_date(&self) -> bool {
        matches!(self.date, RecordDate::Parsed(_))
    }

    /// The parsed date, when valid.
    #[must_use]
    pub const fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        match &self.date {
            RecordDate::Parsed(date) => Some(*date),
            RecordDate::Raw(_) => None,
        }
    }

    /// The record's year; `None` when the date is invalid.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.parsed_date().map(|date| date.year())
    }

    /// The date formatted `M/D/YY` for export, when valid.
    #[must_use]
    pub fn us_date(&self) -> Option<String> {
        self.parsed_date()
            .map(|date| date.format("%-m/%-d/%y").to_string())
    }

    /// The raw date header text, when parsing failed.
    #[must_use]
    pub fn raw_date(&self) -> Option<&str> {
        match &self.date {
            RecordDate::Raw(raw) => Some(raw),
            RecordDate::Parsed(_) => None,
        }
    }

    /// The original undecoded header text, kept when `valid_headers` is
    /// false.
    #[must_use]
    pub fn header_blob(&self) -> Option<&str> {
        self.raw_headers.as_deref()
    }
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

    #[test]
    fn test_build_well_formed() {
        let record = EmailRecord::build(
            "Hi",
            "Alice Adams <alice@Example.com>",
            "bob@x.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        );

        assert!(record.valid_headers);
        assert!(record.valid_date());
        assert_eq!(record.subject, "Hi");
        assert_eq!(record.from_name, "Alice Adams");
        assert_eq!(record.from_email, "alice@Example.com");
        assert_eq!(record.from_host, "example.com");
        assert_eq!(record.to, "bob@x.com");
        assert_eq!(record.year(), Some(2023));
        assert_eq!(record.us_date().unwrap(), "1/2/23");
        assert_eq!(record.verdict, FilterVerdict::Unknown);
        assert!(record.header_blob().is_none());
    }

    #[test]
    fn test_build_encoded_subject() {
        let record = EmailRecord::build(
            "=?utf-8?B?SMOpbGxv?=",
            "alice@example.com",
            "bob@x.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        );
        assert!(record.valid_headers);
        assert_eq!(record.subject, "Héllo");
    }

    #[test]
    fn test_invalid_date_keeps_raw_text() {
        let record = EmailRecord::build("Hi", "alice@example.com", "bob@x.com", "sometime soon");

        assert!(!record.valid_date());
        assert_eq!(record.raw_date(), Some("sometime soon"));
        assert_eq!(record.year(), None);
        assert!(record.us_date().is_none());
        // Header validity is independent of date validity
        assert!(record.valid_headers);
    }

    #[test]
    fn test_bad_subject_encoding_flags_headers() {
        let record = EmailRecord::build(
            "=?utf-8?B?####?=",
            "alice@example.com",
            "bob@x.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        );

        assert!(!record.valid_headers);
        assert_eq!(record.subject, "=?utf-8?B?####?=");
        assert!(record.valid_date());
        assert!(record.header_blob().unwrap().contains("=?utf-8?B?####?="));
    }

    #[test]
    fn test_unparseable_sender_flags_headers() {
        let record = EmailRecord::build(
            "Hi",
            "undisclosed-recipients:;",
            "bob@x.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        );

        assert!(!record.valid_headers);
        assert_eq!(record.from_name, "undisclosed-recipients:;");
        assert_eq!(record.from_email, "");
        assert_eq!(record.from_host, "");
    }

    #[test]
    fn test_with_verdict() {
        let record = EmailRecord::build(
            "Hi",
            "alice@example.com",
            "bob@x.com",
            "Mon, 2 Jan 2023 10:00:00 +0000",
        )
        .with_verdict(FilterVerdict::Passed);
        assert_eq!(record.verdict, FilterVerdict::Passed);
    }
}
