//! Diagnostic collection and rendering.
//!
//! - `diagnostics` accumulates errors and warnings and counts them
//! - `source_map` keeps the source text and renders accumulated
//!   diagnostics with `codespan-reporting`

pub mod diagnostics;
pub mod source_map;


pub use diagnostics::{Diagnostics, IntoDiagnostic};
pub use source_map::SourceMap;
