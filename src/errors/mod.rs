//! Error types and error handling for the compiler.
//!
//! This module defines the single error type shared by every stage:
//!
//! - `Error` carries a primary span plus optional extra spans and fix-its
//! - `ErrorImpl` lists every kind of problem, grouped by the stage that
//!   detects it
//! - Severity and category are derived from the kind, never stored

pub mod errors;


pub use errors::{Error, ErrorCategory, ErrorImpl, ErrorTip, FixIt};
