//! Block-list model and the policy-filter engine.

mod engine;
mod model;

pub use engine::evaluate;
pub use model::{FilterList, FilterReason, FilterVerdict};
