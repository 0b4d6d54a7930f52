/// AST (Abstract Syntax Tree) module
/// Contains the node arena and every node payload
///
/// Submodules:
/// - ast: The `Ast` arena, `NodeId` handles and the `NodeKind` sum type
/// - expressions: Payloads and operators of expression nodes
/// - statements: Payloads of statement and declaration nodes
pub mod ast;
pub mod expressions;
pub mod statements;


pub use ast::{Ast, Node, NodeId, NodeKind};
