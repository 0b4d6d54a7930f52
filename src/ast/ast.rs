use std::ops::Index;

use crate::Span;

use super::{
    expressions::{
        AssignmentExpr, BinaryExpr, BoolLiteral, CallExpr, CastExpr, CommaExpr, FloatLiteral,
        IdentifierExpr, IntLiteral, PostfixExpr, PrefixExpr,
    },
    statements::{
        BlockStmt, CompilationUnit, ExpressionStmt, ForStmt, FunctionDef, IfStmt, ReturnStmt,
        VarDecl, WhileStmt,
    },
};

/// Handle to a node stored in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Every kind of node the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    CompilationUnit(CompilationUnit),

    // Statements
    Block(BlockStmt),
    ExpressionStmt(ExpressionStmt),
    VarDecl(VarDecl),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    FunctionDef(FunctionDef),

    // Expressions
    Identifier(IdentifierExpr),
    IntLiteral(IntLiteral),
    FloatLiteral(FloatLiteral),
    BoolLiteral(BoolLiteral),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    Prefix(PrefixExpr),
    Postfix(PostfixExpr),
    Call(CallExpr),
    Comma(CommaExpr),
    Cast(CastExpr),
}

impl NodeKind {
    pub fn is_expression(&self) -> bool {
        match self {
            NodeKind::CompilationUnit(_)
            | NodeKind::Block(_)
            | NodeKind::ExpressionStmt(_)
            | NodeKind::VarDecl(_)
            | NodeKind::If(_)
            | NodeKind::While(_)
            | NodeKind::For(_)
            | NodeKind::Return(_)
            | NodeKind::FunctionDef(_) => false,
            NodeKind::Identifier(_)
            | NodeKind::IntLiteral(_)
            | NodeKind::FloatLiteral(_)
            | NodeKind::BoolLiteral(_)
            | NodeKind::Binary(_)
            | NodeKind::Assignment(_)
            | NodeKind::Prefix(_)
            | NodeKind::Postfix(_)
            | NodeKind::Call(_)
            | NodeKind::Comma(_)
            | NodeKind::Cast(_) => true,
        }
    }

    /// The node's children in evaluation order.
    ///
    /// Passes rely on this order: siblings are always visited left to right.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::CompilationUnit(unit) => unit.items.clone(),
            NodeKind::Block(block) => block.statements.clone(),
            NodeKind::ExpressionStmt(stmt) => vec![stmt.expression],
            NodeKind::VarDecl(decl) => decl.initializer.into_iter().collect(),
            NodeKind::If(stmt) => {
                let mut children = vec![stmt.condition, stmt.then_block];
                children.extend(stmt.else_branch);
                children
            }
            NodeKind::While(stmt) => vec![stmt.condition, stmt.body],
            NodeKind::For(stmt) => {
                let mut children = Vec::with_capacity(4);
                children.extend(stmt.init.map(|init| init.node()));
                children.extend(stmt.condition);
                children.extend(stmt.update);
                children.push(stmt.body);
                children
            }
            NodeKind::Return(stmt) => stmt.value.into_iter().collect(),
            NodeKind::FunctionDef(def) => vec![def.body],
            NodeKind::Identifier(_)
            | NodeKind::IntLiteral(_)
            | NodeKind::FloatLiteral(_)
            | NodeKind::BoolLiteral(_) => vec![],
            NodeKind::Binary(expr) => vec![expr.left, expr.right],
            NodeKind::Assignment(expr) => vec![expr.value],
            NodeKind::Prefix(expr) => vec![expr.operand],
            NodeKind::Postfix(expr) => vec![expr.operand],
            NodeKind::Call(expr) => expr.arguments.clone(),
            NodeKind::Comma(expr) => expr.expressions.clone(),
            NodeKind::Cast(expr) => vec![expr.operand],
        }
    }

    /// Short name used in logs and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit(_) => "CompilationUnit",
            NodeKind::Block(_) => "BlockStatement",
            NodeKind::ExpressionStmt(_) => "ExpressionStatement",
            NodeKind::VarDecl(_) => "VariableDeclaration",
            NodeKind::If(_) => "IfStatement",
            NodeKind::While(_) => "WhileStatement",
            NodeKind::For(_) => "ForStatement",
            NodeKind::Return(_) => "ReturnStatement",
            NodeKind::FunctionDef(_) => "FunctionDefinition",
            NodeKind::Identifier(_) => "IdentifierExpression",
            NodeKind::IntLiteral(_) => "IntLiteralExpression",
            NodeKind::FloatLiteral(_) => "FloatLiteralExpression",
            NodeKind::BoolLiteral(_) => "BoolLiteralExpression",
            NodeKind::Binary(_) => "BinaryExpression",
            NodeKind::Assignment(_) => "AssignmentExpression",
            NodeKind::Prefix(_) => "PrefixExpression",
            NodeKind::Postfix(_) => "PostfixExpression",
            NodeKind::Call(_) => "FunctionCallExpression",
            NodeKind::Comma(_) => "CommaExpression",
            NodeKind::Cast(_) => "CastExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Arena holding every node of one compilation unit.
///
/// Nodes are appended by the parser and never change afterwards. Passes
/// attach what they learn through side tables keyed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    /// Removes `id` again if it is the most recently pushed node.
    ///
    /// The parser folds a freshly built identifier into the call or
    /// assignment that follows it, so the arena never holds orphans.
    pub(crate) fn pop(&mut self, id: NodeId) -> Option<Node> {
        if id.index() + 1 == self.nodes.len() {
            self.nodes.pop()
        } else {
            None
        }
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self[id].span
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self[id].kind.children()
    }

    /// `id` and everything below it, parents before children.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(next) = stack.pop() {
            result.push(next);
            let children = self.children(next);
            stack.extend(children.into_iter().rev());
        }

        result
    }

    pub fn is_expression(&self, id: NodeId) -> bool {
        self[id].kind.is_expression()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}
