//! Rule- and consistency-driven validation engine for scanned
//! pharmaceutical Batch Manufacturing Records (BMRs).
//!
//! Given per-page OCR output — raw text plus structured form fields,
//! tables, and handwritten regions — this crate extracts typed
//! values, recomputes declared formulas, evaluates SOP rules, and
//! reconciles identifiers, pagination, and the batch date window
//! across the whole document, producing a deterministic set of
//! [`model::ValidationAlert`]s.
//!
//! The engine is a pure, synchronous function of its inputs: no OCR,
//! no persistence, no network or filesystem access, and no human
//! review workflow. See [`orchestrator::ValidationEngine`] for the
//! public entry point.

pub mod dates;
pub mod error;
pub mod extract;
pub mod formula;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod pagination;
pub mod reconcile;
pub mod rules;

pub use error::RuleError;
pub use orchestrator::{DocumentValidationSummary, ValidationEngine};
