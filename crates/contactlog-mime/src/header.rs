//! Tolerant decoding of MIME-encoded header values.
//!
//! Header text from archive exports mixes plain text with RFC 2047 encoded
//! words (`=?charset?B|Q?payload?=`). Decoding is best-effort: a header that
//! cannot be decoded is returned unchanged and flagged, never an error.

use crate::encoding::{charset_to_string, decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};

/// Decodes a raw header value into display text.
///
/// Whitespace runs are collapsed to a single space before decoding. Returns
/// the decoded text and `true` on success; on any decoding failure returns
/// the whitespace-collapsed original and `false`. Empty input decodes to an
/// empty string.
#[must_use]
pub fn decode_header(raw: &str) -> (String, bool) {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return (String::new(), true);
    }
    match decode_encoded_words(&collapsed) {
        Ok(decoded) => (decoded, true),
        Err(_) => (collapsed, false),
    }
}

/// Collapses every run of whitespace to a single space.
fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// A slice of header text: literal text or one encoded word.
enum Segment<'a> {
    Literal(&'a str),
    Word {
        charset: &'a str,
        encoding: &'a str,
        payload: &'a str,
    },
}

impl Segment<'_> {
    const fn is_word(&self) -> bool {
        matches!(self, Self::Word { .. })
    }
}

/// Decodes all encoded words embedded in a header value.
///
/// Whitespace separating two adjacent encoded words is not significant
/// (RFC 2047 section 6.2) and is dropped. Text that merely looks like the
/// start of an encoded word is kept literal; a structurally valid word
/// whose payload or charset cannot be decoded fails the whole header.
fn decode_encoded_words(input: &str) -> Result<String> {
    let mut segments = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("=?") {
        if let Some((word, consumed)) = parse_encoded_word(&rest[start..]) {
            if start > 0 {
                segments.push(Segment::Literal(&rest[..start]));
            }
            segments.push(word);
            rest = &rest[start + consumed..];
        } else {
            // Stray "=?" in ordinary text
            segments.push(Segment::Literal(&rest[..start + 2]));
            rest = &rest[start + 2..];
        }
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Literal(text) => {
                let between_words = text.chars().all(char::is_whitespace)
                    && i > 0
                    && segments[i - 1].is_word()
                    && segments.get(i + 1).is_some_and(Segment::is_word);
                if !between_words {
                    out.push_str(text);
                }
            }
            Segment::Word {
                charset,
                encoding,
                payload,
            } => {
                let bytes = match encoding.to_ascii_uppercase().as_str() {
                    "B" => decode_base64(payload)?,
                    "Q" => decode_quoted_printable(&payload.replace('_', " "))?,
                    other => {
                        return Err(Error::InvalidEncoding(format!(
                            "Unknown encoded-word encoding: {other}"
                        )));
                    }
                };
                out.push_str(&charset_to_string(charset, bytes)?);
            }
        }
    }
    Ok(out)
}

/// Probes for one `=?charset?enc?payload?=` token at the start of `s`.
///
/// Returns the parsed word and the number of bytes consumed, or `None` when
/// the text is not structurally an encoded word.
fn parse_encoded_word(s: &str) -> Option<(Segment<'_>, usize)> {
    let inner = s.strip_prefix("=?")?;
    let (charset, rest) = inner.split_once('?')?;
    let (encoding, rest) = rest.split_once('?')?;
    let end = rest.find("?=")?;
    let payload = &rest[..end];

    if charset.is_empty() || encoding.len() != 1 {
        return None;
    }
    // Encoded words never contain whitespace
    if charset.contains(' ') || payload.contains(' ') {
        return None;
    }

    let consumed = 2 + charset.len() + 1 + encoding.len() + 1 + payload.len() + 2;
    Some((
        Segment::Word {
            charset,
            encoding,
            payload,
        },
        consumed,
    ))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect
)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_header() {
        assert_eq!(decode_header(""), (String::new(), true));
    }

    #[test]
    fn test_plain_header() {
        assert_eq!(
            decode_header("Meeting notes"),
            ("Meeting notes".to_string(), true)
        );
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(
            decode_header("Meeting \t\r\n  notes"),
            ("Meeting notes".to_string(), true)
        );
    }

    #[test]
    fn test_base64_word() {
        let (decoded, ok) = decode_header("=?utf-8?B?SMOpbGxv?=");
        assert!(ok);
        assert_eq!(decoded, "Héllo");
    }

    #[test]
    fn test_quoted_printable_word() {
        let (decoded, ok) = decode_header("=?utf-8?Q?H=C3=A9llo_world?=");
        assert!(ok);
        assert_eq!(decoded, "Héllo world");
    }

    #[test]
    fn test_word_embedded_in_text() {
        let (decoded, ok) = decode_header("Re: =?utf-8?Q?caf=C3=A9?= menu");
        assert!(ok);
        assert_eq!(decoded, "Re: café menu");
    }

    #[test]
    fn test_adjacent_words_join_without_space() {
        let (decoded, ok) = decode_header("=?utf-8?B?SMOp?= =?utf-8?B?bGxv?=");
        assert!(ok);
        assert_eq!(decoded, "Héllo");
    }

    #[test]
    fn test_latin1_word() {
        let (decoded, ok) = decode_header("=?iso-8859-1?Q?H=E9llo?=");
        assert!(ok);
        assert_eq!(decoded, "Héllo");
    }

    #[test]
    fn test_stray_marker_is_literal() {
        let (decoded, ok) = decode_header("is x =? y");
        assert!(ok);
        assert_eq!(decoded, "is x =? y");
    }

    #[test]
    fn test_bad_payload_returns_original() {
        let raw = "=?utf-8?B?####?=";
        let (decoded, ok) = decode_header(raw);
        assert!(!ok);
        assert_eq!(decoded, raw);
    }

    #[test]
    fn test_unsupported_charset_returns_original() {
        let raw = "=?koi8-r?B?SGVsbG8=?=";
        let (decoded, ok) = decode_header(raw);
        assert!(!ok);
        assert_eq!(decoded, raw);
    }

    #[test]
    fn test_failure_keeps_collapsed_whitespace() {
        let (decoded, ok) = decode_header("a  b =?utf-8?X?zzzz?=");
        assert!(!ok);
        assert_eq!(decoded, "a b =?utf-8?X?zzzz?=");
    }
}
