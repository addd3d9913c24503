//! Normalized email records built from raw envelope headers.

mod model;

pub use model::{EmailRecord, RecordDate};
