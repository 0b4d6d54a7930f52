//! Name binding.
//!
//! One pre-order walk over the tree that:
//!
//! - Opens a scope for the compilation unit, every block, every `for` and
//!   every function body (shared with its parameters)
//! - Defines functions, globals, locals and parameters in those scopes
//! - Resolves identifiers, assignment targets and callees to symbols
//!
//! The results live in side tables ([`ScopeTree`], [`Bindings`]); the
//! tree itself is left untouched.

pub mod binding;
pub mod scope;

#[cfg(test)]
mod tests;

pub use binding::{bind, Bindings};
pub use scope::{Scope, ScopeId, ScopeTree, SymbolDeclaration, SymbolId, SymbolKind};
