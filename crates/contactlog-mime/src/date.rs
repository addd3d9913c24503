//! Tolerant date parsing over the formats observed in archive exports.
//!
//! Export tooling is inconsistent about the `Date:` header: RFC-822-like
//! values appear with and without seconds, with numeric or named timezones,
//! with and without the weekday, and one numeric US variant shows up in
//! older exports. Parsing tries a fixed, ordered list of grammars and stops
//! at the first success; order matters, stricter and more common grammars
//! come first so a looser grammar cannot shadow them.
//!
//! The weekday is matched as a token, not validated against the calendar:
//! archives routinely carry a wrong day name and the record is still good.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// How a grammar treats the leading weekday token.
#[derive(Debug, Clone, Copy)]
enum DayName {
    /// `Mon, ` style: day name followed by a comma.
    Comma,
    /// `Mon ` style: bare day name.
    Bare,
    /// No weekday in this grammar.
    Absent,
}

/// How a grammar treats the timezone portion of the input.
#[derive(Debug, Clone, Copy)]
enum Zone {
    /// Numeric offset parsed by `%z`.
    Numeric,
    /// Trailing named zone abbreviation (`GMT`, `EST`, ...); resolved to its
    /// offset, unknown names fail the grammar.
    Named,
    /// No timezone; parsed as a naive timestamp.
    None,
}

/// One date grammar: a chrono format string plus its weekday and timezone
/// handling.
///
/// The weekday never reaches chrono (whose `%a` cross-checks it against the
/// date); it is stripped here as a plain token first.
#[derive(Debug, Clone, Copy)]
struct Grammar {
    format: &'static str,
    day_name: DayName,
    zone: Zone,
}

impl Grammar {
    /// Non-throwing probe: `Some` on a full match, `None` otherwise.
    ///
    /// Naive timestamps resolve to offset `+00:00`; no further timezone
    /// normalization is attempted.
    fn probe(self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let rest = match self.day_name {
            DayName::Comma => {
                let (token, rest) = raw.split_once(',')?;
                is_day_name(token.trim()).then(|| rest.trim_start())?
            }
            DayName::Bare => {
                let (token, rest) = raw.split_once(' ')?;
                is_day_name(token).then(|| rest.trim_start())?
            }
            DayName::Absent => raw,
        };
        match self.zone {
            Zone::Numeric => DateTime::parse_from_str(rest, self.format).ok(),
            Zone::None => NaiveDateTime::parse_from_str(rest, self.format)
                .ok()
                .map(assume_utc),
            Zone::Named => {
                let (head, tail) = rest.rsplit_once(' ')?;
                let offset = zone_offset(tail)?;
                NaiveDateTime::parse_from_str(head.trim_end(), self.format)
                    .ok()?
                    .and_local_timezone(offset)
                    .single()
            }
        }
    }
}

fn assume_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    naive.and_utc().fixed_offset()
}

/// Abbreviated day names, matched case-insensitively and never checked
/// against the calendar date.
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn is_day_name(token: &str) -> bool {
    DAY_NAMES.iter().any(|name| name.eq_ignore_ascii_case(token))
}

/// Named zone abbreviations and their UTC offsets in hours, per RFC 5322
/// §4.3 (the obsolete zone list covers what real archives contain).
const NAMED_ZONES: &[(&str, i32)] = &[
    ("UT", 0),
    ("GMT", 0),
    ("UTC", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
];

fn zone_offset(token: &str) -> Option<FixedOffset> {
    NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .and_then(|(_, hours)| FixedOffset::east_opt(hours * 3600))
}

/// Known date grammars, in priority order.
const GRAMMARS: &[Grammar] = &[
    // Mon, 2 Jan 2023 10:00:00 +0000
    Grammar {
        format: "%e %b %Y %H:%M:%S %z",
        day_name: DayName::Comma,
        zone: Zone::Numeric,
    },
    // Mon, 2 Jan 2023 10:00:00 GMT
    Grammar {
        format: "%e %b %Y %H:%M:%S",
        day_name: DayName::Comma,
        zone: Zone::Named,
    },
    // Mon, 2 Jan 2023 10:00:00
    Grammar {
        format: "%e %b %Y %H:%M:%S",
        day_name: DayName::Comma,
        zone: Zone::None,
    },
    // Mon 2 Jan 2023 10:00:00 +0000
    Grammar {
        format: "%e %b %Y %H:%M:%S %z",
        day_name: DayName::Bare,
        zone: Zone::Numeric,
    },
    // 2 Jan 2023 10:00:00 +0000
    Grammar {
        format: "%e %b %Y %H:%M:%S %z",
        day_name: DayName::Absent,
        zone: Zone::Numeric,
    },
    // Mon, 2 Jan 2023 10:00 +0000
    Grammar {
        format: "%e %b %Y %H:%M %z",
        day_name: DayName::Comma,
        zone: Zone::Numeric,
    },
    // 1/2/23, 10:00
    Grammar {
        format: "%m/%e/%y, %H:%M",
        day_name: DayName::Absent,
        zone: Zone::None,
    },
];

/// Parses a raw date header against the known grammars, in order.
///
/// Returns `None` when no grammar matches; the caller keeps the raw string
/// and marks the record's date invalid. No semantic validation happens
/// beyond what the matching grammar itself enforces; in particular a
/// weekday that disagrees with the date is accepted.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    GRAMMARS.iter().find_map(|grammar| grammar.probe(raw))
}
