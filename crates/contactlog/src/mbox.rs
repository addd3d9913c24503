//! Minimal mbox reading.
//!
//! Messages are delimited by lines starting with `From ` (the classic mbox
//! convention; archivers quote body occurrences as `>From `). Only the
//! envelope headers are extracted, and they are exposed raw — decoding is
//! the pipeline's job, not the reader's.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use mailparse::MailHeaderMap;

/// Raw envelope headers of one archived message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Raw `Subject:` value.
    pub subject: String,
    /// Raw `From:` value.
    pub from: String,
    /// Raw `To:` value.
    pub to: String,
    /// Raw `Date:` value.
    pub date: String,
}

/// Reads every message in an mbox file.
///
/// A message whose headers cannot be parsed yields empty header strings
/// rather than aborting the read; it will surface downstream as a
/// bad-format record.
pub fn read_mbox(path: &Path) -> Result<Vec<RawMessage>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_from(BufReader::new(file))
}

fn read_from(mut reader: impl BufRead) -> Result<Vec<RawMessage>> {
    let mut messages = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut in_message = false;
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        if line.starts_with(b"From ") {
            if in_message {
                messages.push(envelope(&current));
                current.clear();
            }
            in_message = true;
        } else if in_message {
            if line.starts_with(b">From ") {
                // mboxrd quoting
                current.extend_from_slice(&line[1..]);
            } else {
                current.extend_from_slice(&line);
            }
        }
        // Content before the first separator is not a message
    }
    if in_message {
        messages.push(envelope(&current));
    }

    Ok(messages)
}

/// Extracts the raw envelope headers from one message block.
fn envelope(raw: &[u8]) -> RawMessage {
    match mailparse::parse_mail(raw) {
        Ok(mail) => RawMessage {
            subject: raw_header(&mail.headers, "Subject"),
            from: raw_header(&mail.headers, "From"),
            to: raw_header(&mail.headers, "To"),
            date: raw_header(&mail.headers, "Date"),
        },
        Err(_) => RawMessage::default(),
    }
}

fn raw_header(headers: &[mailparse::MailHeader<'_>], name: &str) -> String {
    headers
        .get_first_header(name)
        .map(|header| {
            String::from_utf8_lossy(header.get_value_raw())
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
From alice@example.com Mon Jan  2 10:00:00 2023
From: Alice <alice@example.com>
To: bob@x.com
Subject: =?utf-8?B?SMOpbGxv?=
Date: Mon, 2 Jan 2023 10:00:00 +0000

Body text.
>From here the body continues.

From carol@example.com Tue Jan  3 11:00:00 2023
From: carol@example.com
To: bob@x.com
Subject: Second
Date: Tue, 3 Jan 2023 11:00:00 +0000

Another body.
";

    #[test]
    fn test_splits_messages_on_separator() {
        let messages = read_from(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].from, "Alice <alice@example.com>");
        assert_eq!(messages[1].subject, "Second");
    }

    #[test]
    fn test_headers_are_left_raw() {
        let messages = read_from(Cursor::new(SAMPLE)).unwrap();
        // Encoded words must reach the pipeline undecoded
        assert_eq!(messages[0].subject, "=?utf-8?B?SMOpbGxv?=");
    }

    #[test]
    fn test_quoted_from_line_stays_in_body() {
        let messages = read_from(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_missing_headers_are_empty() {
        let partial = "From x@y.z Mon Jan  2 10:00:00 2023\nSubject: Only\n\nBody.\n";
        let messages = read_from(Cursor::new(partial)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].subject, "Only");
        assert_eq!(messages[0].from, "");
        assert_eq!(messages[0].date, "");
    }

    #[test]
    fn test_empty_input() {
        let messages = read_from(Cursor::new("")).unwrap();
        assert!(messages.is_empty());
    }
}
