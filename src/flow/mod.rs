//! Definite-return analysis.
//!
//! A read-only walk that decides, for each function, whether every path
//! through its body reaches a `return`. Functions with a non-void return
//! type that can fall off the end are reported; checking always continues
//! with the next function.

pub mod flow_check;


pub use flow_check::{flow_check, FlowChecker, FlowInfo};
