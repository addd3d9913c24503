//! # contactlog-mime
//!
//! Header-level parsing for mail archive exports.
//!
//! This crate provides the three tolerant parsing primitives the contact-log
//! pipeline is built on:
//!
//! - **Header decoding**: RFC 2047 encoded-word decoding with whitespace
//!   normalization; failures degrade to the original text, never an error.
//! - **Date parsing**: an ordered table of date grammars reflecting the
//!   observed export variants, tried in sequence, first match wins.
//! - **Address parsing**: splitting a `From:` value into display name,
//!   address, and host.
//!
//! ## Quick Start
//!
//! ```
//! use contactlog_mime::{decode_header, parse_date, parse_sender};
//!
//! let (subject, ok) = decode_header("=?utf-8?B?SMOpbGxv?=");
//! assert!(ok);
//! assert_eq!(subject, "Héllo");
//!
//! let date = parse_date("Mon, 2 Jan 2023 10:00:00 +0000");
//! assert!(date.is_some());
//!
//! let sender = parse_sender("Alice <alice@example.com>").unwrap();
//! assert_eq!(sender.host, "example.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod date;
mod error;
mod header;

pub mod encoding;

pub use address::{Sender, parse_sender};
pub use date::parse_date;
pub use error::{Error, Result};
pub use header::decode_header;
