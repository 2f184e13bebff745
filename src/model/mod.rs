//! Core data model shared by every validation component: bounding
//! boxes and source locations, the typed value/formula/alert shapes,
//! SOP rule types, page inputs, batch date bounds, and the monotonic
//! id generator.

pub mod dates;
pub mod ids;
pub mod input;
pub mod result;
pub mod rules;
pub mod types;

pub use dates::*;
pub use ids::*;
pub use input::*;
pub use result::*;
pub use rules::*;
pub use types::*;
