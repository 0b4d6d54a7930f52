//! Parser module for building the AST arena.
//!
//! Transforms a token stream into an [`Ast`](crate::ast::Ast) rooted at a
//! `CompilationUnit`. Expressions go through a Pratt parser with binding
//! powers for precedence; statements and declarations have dedicated
//! functions. It handles:
//!
//! - Top-level functions and global variables
//! - Statements (blocks, declarations, `if`, `while`, `for`, `return`)
//! - Expressions (binary, assignment, prefix, postfix, call, comma, cast)
//! - Type annotations, interned as they are read
//!
//! Syntax errors stop parsing at the first one.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;

pub use parser::parse;
