//! The pipeline from source text to a checked program.

pub mod driver;
pub mod options;

#[cfg(test)]
mod tests;

pub use driver::{check_source, CheckedProgram, Compilation};
pub use options::{CompilerOptions, ErrorPolicy};
