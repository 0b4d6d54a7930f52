use crate::{
    ast::{
        expressions::{
            AssignmentExpr, BinaryExpr, BoolLiteral, CallExpr, CastExpr, CommaExpr, FloatLiteral,
            IdentifierExpr, IntLiteral, PostfixExpr, PrefixExpr,
        },
        statements::{
            BlockStmt, CompilationUnit, ExpressionStmt, ForInit, ForStmt, FunctionDef, IfStmt,
            ReturnStmt, VarDecl, VariableScope, Visibility, WhileStmt,
        },
        Ast, NodeId,
    },
    type_checker::TypeTable,
    types::{InferKind, TypeId, TypeInterner},
};

use super::returning::ReturningVisitor;

/// Renders a tree as nested s-expressions, one per node.
///
/// Literals print their type: the checked type when a [`TypeTable`] is
/// attached, the parse-time type otherwise.
pub struct AstStringifier<'a> {
    types: &'a TypeInterner,
    table: Option<&'a TypeTable>,
}

impl<'a> AstStringifier<'a> {
    pub fn new(types: &'a TypeInterner) -> Self {
        AstStringifier { types, table: None }
    }

    pub fn with_type_table(types: &'a TypeInterner, table: &'a TypeTable) -> Self {
        AstStringifier {
            types,
            table: Some(table),
        }
    }

    /// Renders the whole tree, or nothing for an empty arena.
    pub fn stringify(&mut self, ast: &Ast) -> String {
        match ast.root() {
            Some(root) => self.visit(ast, root),
            None => String::new(),
        }
    }

    fn join(&mut self, ast: &Ast, ids: &[NodeId], separator: &str) -> String {
        ids.iter()
            .map(|id| self.visit(ast, *id))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn literal_type(&self, id: NodeId, parsed: TypeId) -> String {
        let ty = self
            .table
            .and_then(|table| table.expr_type(id))
            .unwrap_or(parsed);
        self.types.display(ty).to_string()
    }
}

impl ReturningVisitor for AstStringifier<'_> {
    type Output = String;

    fn visit_compilation_unit(&mut self, ast: &Ast, _id: NodeId, unit: &CompilationUnit) -> String {
        format!("(CompilationUnit '{}')", self.join(ast, &unit.items, " "))
    }

    fn visit_block(&mut self, ast: &Ast, _id: NodeId, block: &BlockStmt) -> String {
        format!("(BlockStatement '{}')", self.join(ast, &block.statements, " "))
    }

    fn visit_expression_stmt(&mut self, ast: &Ast, _id: NodeId, stmt: &ExpressionStmt) -> String {
        format!("(ExpressionStatement '{}')", self.visit(ast, stmt.expression))
    }

    fn visit_var_decl(&mut self, ast: &Ast, _id: NodeId, decl: &VarDecl) -> String {
        let vis = match decl.visibility {
            Visibility::Public => "public",
            Visibility::Private => "private",
        };
        let scope = match decl.scope {
            VariableScope::Local => "local",
            VariableScope::Global => "global",
        };
        let head = format!(
            "(VariableDeclaration vis='{}' scope='{}' const='{}' type='{}' id='{}'",
            vis,
            scope,
            decl.constness.keyword(),
            self.types.display(decl.declared_type),
            decl.name
        );

        match decl.initializer {
            Some(initializer) => format!("{} expr='{}')", head, self.visit(ast, initializer)),
            None => format!("{})", head),
        }
    }

    fn visit_if(&mut self, ast: &Ast, _id: NodeId, stmt: &IfStmt) -> String {
        let condition = self.visit(ast, stmt.condition);
        let body = self.visit(ast, stmt.then_block);

        match stmt.else_branch {
            Some(else_branch) => format!(
                "(IfStatement cond='{}' body='{}' else='{}')",
                condition,
                body,
                self.visit(ast, else_branch)
            ),
            None => format!("(IfStatement cond='{}' body='{}')", condition, body),
        }
    }

    fn visit_while(&mut self, ast: &Ast, _id: NodeId, stmt: &WhileStmt) -> String {
        format!(
            "(WhileStatement cond='{}' body='{}')",
            self.visit(ast, stmt.condition),
            self.visit(ast, stmt.body)
        )
    }

    fn visit_for(&mut self, ast: &Ast, _id: NodeId, stmt: &ForStmt) -> String {
        let mut clauses = String::new();

        match stmt.init {
            Some(ForInit::Declaration(decl)) => {
                clauses += &format!(" decl='{}'", self.visit(ast, decl));
            }
            Some(ForInit::Expression(expr)) => {
                clauses += &format!(" expr='{}'", self.visit(ast, expr));
            }
            None => {}
        }
        if let Some(condition) = stmt.condition {
            clauses += &format!(" cond='{}'", self.visit(ast, condition));
        }
        if let Some(update) = stmt.update {
            clauses += &format!(" update='{}'", self.visit(ast, update));
        }

        format!(
            "(ForStatement{} body='{}')",
            clauses,
            self.visit(ast, stmt.body)
        )
    }

    fn visit_return(&mut self, ast: &Ast, _id: NodeId, stmt: &ReturnStmt) -> String {
        let value = stmt
            .value
            .map(|value| self.visit(ast, value))
            .unwrap_or_default();
        format!("(ReturnStatement expr='{}')", value)
    }

    fn visit_function_def(&mut self, ast: &Ast, _id: NodeId, def: &FunctionDef) -> String {
        let params = def
            .params
            .iter()
            .map(|param| {
                format!(
                    "{} {}: {}",
                    param.constness.keyword(),
                    param.name,
                    self.types.display(param.ty)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let ret = match def.return_type_span {
            Some(_) => format!(" ret='{}'", self.types.display(def.return_type)),
            None => String::new(),
        };

        format!(
            "(FunctionDefinition id='{}', params='{}'{} body='{}')",
            def.name,
            params,
            ret,
            self.visit(ast, def.body)
        )
    }

    fn visit_identifier(&mut self, _ast: &Ast, _id: NodeId, expr: &IdentifierExpr) -> String {
        format!("(IdentifierExpression id='{}')", expr.name)
    }

    fn visit_int_literal(&mut self, _ast: &Ast, id: NodeId, lit: &IntLiteral) -> String {
        let parsed = match lit.suffix {
            Some(kind) => self.types.int(kind),
            None => self.types.not_yet_inferred(InferKind::IntegerLiteral),
        };
        format!(
            "(IntLiteralExpression base='{}' text='{}' type='{}')",
            lit.base.name(),
            lit.text,
            self.literal_type(id, parsed)
        )
    }

    fn visit_float_literal(&mut self, _ast: &Ast, id: NodeId, lit: &FloatLiteral) -> String {
        let parsed = match lit.suffix {
            Some(kind) => self.types.float(kind),
            None => self.types.not_yet_inferred(InferKind::FloatLiteral),
        };
        format!(
            "(FloatLiteralExpression text='{}' type='{}')",
            lit.text,
            self.literal_type(id, parsed)
        )
    }

    fn visit_bool_literal(&mut self, _ast: &Ast, _id: NodeId, lit: &BoolLiteral) -> String {
        format!("(BoolLiteralExpression {})", lit.value)
    }

    fn visit_binary(&mut self, ast: &Ast, _id: NodeId, expr: &BinaryExpr) -> String {
        format!(
            "(BinaryExpression BinOp='{}' lhs='{}' rhs={})",
            expr.op.symbol(),
            self.visit(ast, expr.left),
            self.visit(ast, expr.right)
        )
    }

    fn visit_assignment(&mut self, ast: &Ast, _id: NodeId, expr: &AssignmentExpr) -> String {
        let op = match expr.op {
            Some(op) => format!("{}=", op.symbol()),
            None => String::from("="),
        };
        format!(
            "(AssignmentExpression op='{}' lhs='{}' rhs={})",
            op,
            expr.target,
            self.visit(ast, expr.value)
        )
    }

    fn visit_prefix(&mut self, ast: &Ast, _id: NodeId, expr: &PrefixExpr) -> String {
        format!(
            "(PrefixExpression op='{}' expr='{}')",
            expr.op.symbol(),
            self.visit(ast, expr.operand)
        )
    }

    fn visit_postfix(&mut self, ast: &Ast, _id: NodeId, expr: &PostfixExpr) -> String {
        format!(
            "(PostfixExpression op='{}' expr='{}')",
            expr.op.symbol(),
            self.visit(ast, expr.operand)
        )
    }

    fn visit_call(&mut self, ast: &Ast, _id: NodeId, expr: &CallExpr) -> String {
        format!(
            "(FunctionCallExpression id='{}' args='{}')",
            expr.callee,
            self.join(ast, &expr.arguments, ", ")
        )
    }

    fn visit_comma(&mut self, ast: &Ast, _id: NodeId, expr: &CommaExpr) -> String {
        format!("(CommaExpression {})", self.join(ast, &expr.expressions, " "))
    }

    fn visit_cast(&mut self, ast: &Ast, _id: NodeId, expr: &CastExpr) -> String {
        format!(
            "(CastExpression type='{}' expr='{}')",
            self.types.display(expr.target),
            self.visit(ast, expr.operand)
        )
    }
}
