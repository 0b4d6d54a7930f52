//! Tree traversal.
//!
//! Two families share one exhaustive dispatch over [`NodeKind`](crate::ast::NodeKind):
//!
//! - `visitor` walks for side effects; unhandled kinds visit their children
//! - `returning` computes a value per node, folding child results left to
//!   right through an overridable aggregation
//! - `stringifier` renders a tree as s-expressions for dumps and tests
//!
//! Children are always visited in their declared order.

pub mod returning;
pub mod stringifier;
pub mod visitor;


pub use returning::{accept, walk_children_returning, ReturningVisitor};
pub use stringifier::AstStringifier;
pub use visitor::{visit_node, walk_children, Visitor};
