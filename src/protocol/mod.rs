//! ACP models
//!
//! A checked-in slice of the generated output, built with
//! `runtime_path = "crate"`: content blocks, permission outcomes, request ids
//! and the method tables. It keeps every runtime codec exercised against
//! real protocol shapes.

mod meta;
mod schema;

pub use meta::*;
pub use schema::*;
