//! Reconciles the declared commencement/completion window from
//! structured and raw-text extraction, then validates every dated
//! value in the document falls inside it.

mod bounds;
pub mod patterns;

pub use bounds::{extract_batch_date_bounds, validate_date_window};
