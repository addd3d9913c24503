//! # contactlog-core
//!
//! Core pipeline for the contact-log export:
//!
//! - **Records**: one [`EmailRecord`] per archived message, built from raw
//!   envelope headers with tolerant decoding and date parsing.
//! - **Filtering**: block-lists ([`FilterList`]) evaluated in strict
//!   priority order with a single deterministic reason per failure.
//! - **Classification**: partitioning a batch into valid, bad-format, and
//!   filtered buckets with chronological output ordering.
//! - **Export rows**: the row sets and header rows for the four output
//!   artifacts, independent of the file format they are written to.
//!
//! Everything here is synchronous and pure over in-memory sequences; a
//! malformed record degrades to a flagged entry in the bad-format bucket
//! and never aborts the batch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod export;
pub mod filter;
pub mod record;

pub use classify::{Classification, classify};
pub use export::{Table, bad_format_table, filtered_table, stats_tables, valid_table};
pub use filter::{FilterList, FilterReason, FilterVerdict, evaluate};
pub use record::{EmailRecord, RecordDate};
