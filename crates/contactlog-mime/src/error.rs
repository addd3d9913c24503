//! Error types for header, date, and address parsing.

use std::string::FromUtf8Error;

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 decode error.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// Encoded-word charset the decoder does not handle.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Sender address could not be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
