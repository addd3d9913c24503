//! Decoding primitives for MIME header content.
//!
//! Supports Base64 and Quoted-Printable payloads as used by RFC 2047
//! encoded words.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '=' {
            // Soft line break
            if chars.peek() == Some(&'\r') {
                chars.next(); // consume \r
                if chars.peek() == Some(&'\n') {
                    chars.next(); // consume \n
                    continue;
                }
            } else if chars.peek() == Some(&'\n') {
                chars.next(); // consume \n
                continue;
            }

            // Hex encoded byte
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 {
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
                result.push(byte);
            } else {
                return Err(Error::InvalidEncoding(
                    "Incomplete escape sequence".to_string(),
                ));
            }
        } else if ch.is_ascii() {
            result.push(ch as u8);
        } else {
            return Err(Error::InvalidEncoding(format!(
                "Non-ASCII character in encoded text: {ch}"
            )));
        }
    }

    Ok(result)
}

/// Converts decoded payload bytes to text according to the declared charset.
///
/// Handles the charsets observed in the archive exports: UTF-8, US-ASCII,
/// and Latin-1.
///
/// # Errors
///
/// Returns an error for any other charset, or if the bytes are not valid
/// for the declared one.
pub fn charset_to_string(charset: &str, bytes: Vec<u8>) -> Result<String> {
    // Charset may carry an RFC 2231 language tag, e.g. "utf-8*en"
    let name = charset
        .split('*')
        .next()
        .unwrap_or(charset)
        .to_ascii_lowercase();

    match name.as_str() {
        "utf-8" | "utf8" | "us-ascii" | "ascii" => String::from_utf8(bytes).map_err(Into::into),
        "iso-8859-1" | "latin1" | "latin-1" => {
            // Latin-1 maps byte values directly to code points
            Ok(bytes.into_iter().map(char::from).collect())
        }
        _ => Err(Error::UnsupportedCharset(charset.to_string())),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        let decoded = decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(decode_base64("not base64!!!").is_err());
    }

    #[test]
    fn test_quoted_printable_decode() {
        let decoded = decode_quoted_printable("Hello, World!").unwrap();
        assert_eq!(decoded, b"Hello, World!");

        let decoded = decode_quoted_printable("H=C3=A9llo").unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "Héllo");
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        let decoded = decode_quoted_printable("Hello=\r\nWorld").unwrap();
        assert_eq!(decoded, b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_incomplete_escape() {
        assert!(decode_quoted_printable("abc=4").is_err());
        assert!(decode_quoted_printable("abc=zz").is_err());
    }

    #[test]
    fn test_charset_utf8() {
        let text = charset_to_string("UTF-8", "Héllo".as_bytes().to_vec()).unwrap();
        assert_eq!(text, "Héllo");
    }

    #[test]
    fn test_charset_latin1() {
        let text = charset_to_string("ISO-8859-1", vec![0x48, 0xE9]).unwrap();
        assert_eq!(text, "Hé");
    }

    #[test]
    fn test_charset_unsupported() {
        let err = charset_to_string("koi8-r", vec![0x41]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCharset(_)));
    }
}
