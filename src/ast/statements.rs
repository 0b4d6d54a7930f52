use crate::{types::TypeId, Span};

use super::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constness {
    Const,
    Var,
}

impl Constness {
    pub fn keyword(self) -> &'static str {
        match self {
            Constness::Const => "const",
            Constness::Var => "var",
        }
    }
}

/// Where a variable declaration appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableScope {
    Local,
    Global,
}

/// Root of the tree: the functions and globals of one source file, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub items: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub statements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: NodeId,
}

/// `const x: T = e;` and friends.
///
/// `declared_type` is the annotation as written, or the
/// `NotYetInferred(VariableDeclaration)` placeholder when there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub visibility: Visibility,
    pub constness: Constness,
    pub scope: VariableScope,
    pub declared_type: TypeId,
    pub type_span: Option<Span>,
    pub name: String,
    pub name_span: Span,
    /// Span of the `const`/`var` keyword.
    pub keyword_span: Span,
    pub initializer: Option<NodeId>,
}

/// `if cond { .. } else ..`. The else branch is a block or another if.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: NodeId,
    pub then_block: NodeId,
    pub else_branch: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: NodeId,
    pub body: NodeId,
}

/// The first clause of a `for`. A declaration and an expression are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForInit {
    Declaration(NodeId),
    Expression(NodeId),
}

impl ForInit {
    pub fn node(self) -> NodeId {
        match self {
            ForInit::Declaration(id) | ForInit::Expression(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<NodeId>,
    pub update: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub name_span: Span,
    pub ty: TypeId,
    pub type_span: Span,
    pub constness: Constness,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub visibility: Visibility,
    pub name: String,
    pub name_span: Span,
    pub params: Vec<Param>,
    /// `void` when the source omits `-> T`.
    pub return_type: TypeId,
    pub return_type_span: Option<Span>,
    pub body: NodeId,
}
