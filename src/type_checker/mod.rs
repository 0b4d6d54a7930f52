//! Type checking.
//!
//! A second walk over the bound tree that re-enters the scopes built by
//! binding and gives every expression a type:
//!
//! - Literals without a suffix start as placeholders and are rewritten to
//!   the type their context demands, or to `i32`/`f32` when nothing does
//! - Operands, initializers, arguments and return values must agree
//!   exactly; there is no implicit widening
//! - Anything that fails to check is typed `Error`, and checks over an
//!   `Error` operand are skipped so one mistake is reported once
//!
//! Results go into a [`TypeTable`] side table.

pub mod binary_operation;
pub mod type_checker;

#[cfg(test)]
mod tests;

pub use binary_operation::{binary_result_type, is_valid_cast};
pub use type_checker::{type_check, TypeChecker, TypeTable};
