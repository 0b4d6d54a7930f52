//! The type system.
//!
//! Types form a closed set and are interned per compilation:
//!
//! - `types` defines the `Type` variants and the `TypeId` handle
//! - `interner` owns the canonical instances and the coercion and
//!   literal defaulting rules that only need to look at types

pub mod interner;
pub mod types;


pub use interner::TypeInterner;
pub use types::{FloatKind, InferKind, IntKind, Type, TypeId};
