use tracing::trace;

use crate::ast::{
    expressions::{
        AssignmentExpr, BinaryExpr, BoolLiteral, CallExpr, CastExpr, CommaExpr, FloatLiteral,
        IdentifierExpr, IntLiteral, PostfixExpr, PrefixExpr,
    },
    statements::{
        BlockStmt, CompilationUnit, ExpressionStmt, ForStmt, FunctionDef, IfStmt, ReturnStmt,
        VarDecl, WhileStmt,
    },
    Ast, NodeId, NodeKind,
};

/// Side-effecting traversal over an [`Ast`].
///
/// Every node kind has a handler whose default implementation visits the
/// node's children in order. Implementors override the kinds they care
/// about; an override that still wants the children visited calls
/// [`walk_children`] itself, before or after its own work.
///
/// ```ignore
/// struct CountCalls(usize);
///
/// impl Visitor for CountCalls {
///     fn visit_call(&mut self, ast: &Ast, id: NodeId, _call: &CallExpr) {
///         self.0 += 1;
///         walk_children(self, ast, id);
///     }
/// }
/// ```
pub trait Visitor: Sized {
    /// Dispatches on the kind of `id`.
    fn visit(&mut self, ast: &Ast, id: NodeId) {
        visit_node(self, ast, id)
    }

    fn visit_compilation_unit(&mut self, ast: &Ast, id: NodeId, _unit: &CompilationUnit) {
        walk_children(self, ast, id)
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &BlockStmt) {
        walk_children(self, ast, id)
    }

    fn visit_expression_stmt(&mut self, ast: &Ast, id: NodeId, _stmt: &ExpressionStmt) {
        walk_children(self, ast, id)
    }

    fn visit_var_decl(&mut self, ast: &Ast, id: NodeId, _decl: &VarDecl) {
        walk_children(self, ast, id)
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId, _stmt: &IfStmt) {
        walk_children(self, ast, id)
    }

    fn visit_while(&mut self, ast: &Ast, id: NodeId, _stmt: &WhileStmt) {
        walk_children(self, ast, id)
    }

    fn visit_for(&mut self, ast: &Ast, id: NodeId, _stmt: &ForStmt) {
        walk_children(self, ast, id)
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId, _stmt: &ReturnStmt) {
        walk_children(self, ast, id)
    }

    fn visit_function_def(&mut self, ast: &Ast, id: NodeId, _def: &FunctionDef) {
        walk_children(self, ast, id)
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId, _expr: &IdentifierExpr) {
        walk_children(self, ast, id)
    }

    fn visit_int_literal(&mut self, ast: &Ast, id: NodeId, _lit: &IntLiteral) {
        walk_children(self, ast, id)
    }

    fn visit_float_literal(&mut self, ast: &Ast, id: NodeId, _lit: &FloatLiteral) {
        walk_children(self, ast, id)
    }

    fn visit_bool_literal(&mut self, ast: &Ast, id: NodeId, _lit: &BoolLiteral) {
        walk_children(self, ast, id)
    }

    fn visit_binary(&mut self, ast: &Ast, id: NodeId, _expr: &BinaryExpr) {
        walk_children(self, ast, id)
    }

    fn visit_assignment(&mut self, ast: &Ast, id: NodeId, _expr: &AssignmentExpr) {
        walk_children(self, ast, id)
    }

    fn visit_prefix(&mut self, ast: &Ast, id: NodeId, _expr: &PrefixExpr) {
        walk_children(self, ast, id)
    }

    fn visit_postfix(&mut self, ast: &Ast, id: NodeId, _expr: &PostfixExpr) {
        walk_children(self, ast, id)
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId, _expr: &CallExpr) {
        walk_children(self, ast, id)
    }

    fn visit_comma(&mut self, ast: &Ast, id: NodeId, _expr: &CommaExpr) {
        walk_children(self, ast, id)
    }

    fn visit_cast(&mut self, ast: &Ast, id: NodeId, _expr: &CastExpr) {
        walk_children(self, ast, id)
    }
}

/// Calls the handler of `visitor` that matches the kind of `id`.
pub fn visit_node<V: Visitor>(visitor: &mut V, ast: &Ast, id: NodeId) {
    trace!(node = id.index(), kind = ast[id].kind.name(), "visit");
    match &ast[id].kind {
        NodeKind::CompilationUnit(unit) => visitor.visit_compilation_unit(ast, id, unit),
        NodeKind::Block(block) => visitor.visit_block(ast, id, block),
        NodeKind::ExpressionStmt(stmt) => visitor.visit_expression_stmt(ast, id, stmt),
        NodeKind::VarDecl(decl) => visitor.visit_var_decl(ast, id, decl),
        NodeKind::If(stmt) => visitor.visit_if(ast, id, stmt),
        NodeKind::While(stmt) => visitor.visit_while(ast, id, stmt),
        NodeKind::For(stmt) => visitor.visit_for(ast, id, stmt),
        NodeKind::Return(stmt) => visitor.visit_return(ast, id, stmt),
        NodeKind::FunctionDef(def) => visitor.visit_function_def(ast, id, def),
        NodeKind::Identifier(expr) => visitor.visit_identifier(ast, id, expr),
        NodeKind::IntLiteral(lit) => visitor.visit_int_literal(ast, id, lit),
        NodeKind::FloatLiteral(lit) => visitor.visit_float_literal(ast, id, lit),
        NodeKind::BoolLiteral(lit) => visitor.visit_bool_literal(ast, id, lit),
        NodeKind::Binary(expr) => visitor.visit_binary(ast, id, expr),
        NodeKind::Assignment(expr) => visitor.visit_assignment(ast, id, expr),
        NodeKind::Prefix(expr) => visitor.visit_prefix(ast, id, expr),
        NodeKind::Postfix(expr) => visitor.visit_postfix(ast, id, expr),
        NodeKind::Call(expr) => visitor.visit_call(ast, id, expr),
        NodeKind::Comma(expr) => visitor.visit_comma(ast, id, expr),
        NodeKind::Cast(expr) => visitor.visit_cast(ast, id, expr),
    }
}

/// Visits the children of `id` in their declared order.
pub fn walk_children<V: Visitor>(visitor: &mut V, ast: &Ast, id: NodeId) {
    for child in ast.children(id) {
        visitor.visit(ast, child);
    }
}
