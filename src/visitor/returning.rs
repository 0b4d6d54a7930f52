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

/// Traversal that computes a value per node.
///
/// A handler's default visits every child, producing one `Output` each,
/// and folds them left to right through [`ReturningVisitor::aggregate`].
/// The fold starts from `Output::default()`. The default aggregation keeps
/// only the latest value, so siblings run for their effects and the last
/// child's result becomes the parent's.
pub trait ReturningVisitor: Sized {
    type Output: Default;

    /// Combines the result so far with the next child's result.
    fn aggregate(&mut self, _aggregate: Self::Output, next: Self::Output) -> Self::Output {
        next
    }

    fn visit(&mut self, ast: &Ast, id: NodeId) -> Self::Output {
        accept(self, ast, id)
    }

    fn visit_children(&mut self, ast: &Ast, id: NodeId) -> Self::Output {
        walk_children_returning(self, ast, id)
    }

    fn visit_compilation_unit(
        &mut self,
        ast: &Ast,
        id: NodeId,
        _unit: &CompilationUnit,
    ) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &BlockStmt) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_expression_stmt(
        &mut self,
        ast: &Ast,
        id: NodeId,
        _stmt: &ExpressionStmt,
    ) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_var_decl(&mut self, ast: &Ast, id: NodeId, _decl: &VarDecl) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId, _stmt: &IfStmt) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_while(&mut self, ast: &Ast, id: NodeId, _stmt: &WhileStmt) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_for(&mut self, ast: &Ast, id: NodeId, _stmt: &ForStmt) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId, _stmt: &ReturnStmt) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_function_def(&mut self, ast: &Ast, id: NodeId, _def: &FunctionDef) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId, _expr: &IdentifierExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_int_literal(&mut self, ast: &Ast, id: NodeId, _lit: &IntLiteral) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_float_literal(&mut self, ast: &Ast, id: NodeId, _lit: &FloatLiteral) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_bool_literal(&mut self, ast: &Ast, id: NodeId, _lit: &BoolLiteral) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_binary(&mut self, ast: &Ast, id: NodeId, _expr: &BinaryExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_assignment(&mut self, ast: &Ast, id: NodeId, _expr: &AssignmentExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_prefix(&mut self, ast: &Ast, id: NodeId, _expr: &PrefixExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_postfix(&mut self, ast: &Ast, id: NodeId, _expr: &PostfixExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId, _expr: &CallExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_comma(&mut self, ast: &Ast, id: NodeId, _expr: &CommaExpr) -> Self::Output {
        self.visit_children(ast, id)
    }

    fn visit_cast(&mut self, ast: &Ast, id: NodeId, _expr: &CastExpr) -> Self::Output {
        self.visit_children(ast, id)
    }
}

/// Calls the handler of `visitor` that matches the kind of `id` and
/// returns its result.
pub fn accept<V: ReturningVisitor>(visitor: &mut V, ast: &Ast, id: NodeId) -> V::Output {
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

/// Folds the results of the children of `id`, in declared order.
pub fn walk_children_returning<V: ReturningVisitor>(
    visitor: &mut V,
    ast: &Ast,
    id: NodeId,
) -> V::Output {
    let mut result = V::Output::default();
    for child in ast.children(id) {
        let next = visitor.visit(ast, child);
        result = visitor.aggregate(result, next);
    }
    result
}
