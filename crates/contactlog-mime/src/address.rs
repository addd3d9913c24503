//! Sender address parsing.

use crate::error::{Error, Result};
use mailparse::MailAddr;

/// A sender address split into its display parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Display name, empty when the header carries only an address.
    pub display_name: String,
    /// The address itself, as written.
    pub email: String,
    /// Host part of the address, lowercased; empty when the address has no
    /// `@`.
    pub host: String,
}

/// Parses a decoded `From:` value into its parts.
///
/// A header listing several addresses resolves to the first one; addresses
/// inside a group are unwrapped.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] when the value is not parseable or
/// contains no address at all. Callers treat this as a header-validity
/// failure on the record.
pub fn parse_sender(raw: &str) -> Result<Sender> {
    let parsed = mailparse::addrparse(raw).map_err(|e| Error::InvalidAddress(e.to_string()))?;

    for addr in parsed.iter() {
        let single = match addr {
            MailAddr::Single(info) => info,
            MailAddr::Group(group) => match group.addrs.first() {
                Some(info) => info,
                None => continue,
            },
        };
        return Ok(Sender {
            display_name: single.display_name.clone().unwrap_or_default(),
            email: single.addr.clone(),
            host: host_of(&single.addr),
        });
    }

    Err(Error::InvalidAddress(raw.to_string()))
}

/// Host part of an address, lowercased.
fn host_of(email: &str) -> String {
    email
        .rsplit_once('@')
        .map(|(_, host)| host.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_address() {
        let sender = parse_sender("alice@example.com").unwrap();
        assert_eq!(sender.display_name, "");
        assert_eq!(sender.email, "alice@example.com");
        assert_eq!(sender.host, "example.com");
    }

    #[test]
    fn test_display_name_and_angle_brackets() {
        let sender = parse_sender("Alice Adams <alice@Example.COM>").unwrap();
        assert_eq!(sender.display_name, "Alice Adams");
        assert_eq!(sender.email, "alice@Example.COM");
        assert_eq!(sender.host, "example.com");
    }

    #[test]
    fn test_quoted_display_name() {
        let sender = parse_sender("\"Adams, Alice\" <alice@example.com>").unwrap();
        assert_eq!(sender.display_name, "Adams, Alice");
        assert_eq!(sender.email, "alice@example.com");
    }

    #[test]
    fn test_first_of_several() {
        let sender = parse_sender("alice@example.com, bob@example.org").unwrap();
        assert_eq!(sender.email, "alice@example.com");
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(parse_sender("").is_err());
    }

    #[test]
    fn test_empty_group_is_invalid() {
        assert!(parse_sender("undisclosed-recipients:;").is_err());
    }
}
