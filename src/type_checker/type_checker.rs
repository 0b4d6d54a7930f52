use std::collections::{HashMap, HashSet};

use tracing::{debug, info, trace};

use crate::{
    ast::{
        expressions::{
            AssignmentExpr, BinaryExpr, BoolLiteral, CallExpr, CastExpr, CommaExpr, FloatLiteral,
            IdentifierExpr, IntBase, IntLiteral, PostfixExpr, PrefixExpr, PrefixOp,
        },
        statements::{
            BlockStmt, CompilationUnit, ExpressionStmt, ForInit, ForStmt, FunctionDef, IfStmt,
            ReturnStmt, VarDecl, WhileStmt,
        },
        Ast, NodeId, NodeKind,
    },
    binding::{Bindings, ScopeId, ScopeTree, SymbolId, SymbolKind},
    diagnostics::Diagnostics,
    errors::errors::{Error, ErrorImpl},
    types::{InferKind, Type, TypeId, TypeInterner},
    visitor::ReturningVisitor,
    Span,
};

use super::binary_operation::{binary_result_type, is_valid_cast};

/// Types the checker settled on.
///
/// Every expression node of an accepted program has an entry holding a
/// concrete type. Symbols map to the type of the variable, parameter or
/// function signature they name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    expr_types: HashMap<NodeId, TypeId>,
    symbol_types: HashMap<SymbolId, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr_type(&self, node: NodeId) -> Option<TypeId> {
        self.expr_types.get(&node).copied()
    }

    pub fn symbol_type(&self, symbol: SymbolId) -> Option<TypeId> {
        self.symbol_types.get(&symbol).copied()
    }

    pub fn set_expr_type(&mut self, node: NodeId, ty: TypeId) {
        self.expr_types.insert(node, ty);
    }

    pub fn set_symbol_type(&mut self, symbol: SymbolId, ty: TypeId) {
        self.symbol_types.insert(symbol, ty);
    }

    pub fn expr_count(&self) -> usize {
        self.expr_types.len()
    }

    pub fn exprs(&self) -> impl Iterator<Item = (NodeId, TypeId)> + '_ {
        self.expr_types.iter().map(|(node, ty)| (*node, *ty))
    }
}

#[derive(Debug, Clone)]
struct FunctionContext {
    name: String,
    return_type: TypeId,
}

pub struct TypeChecker<'a> {
    types: &'a mut TypeInterner,
    scopes: &'a ScopeTree,
    bindings: &'a Bindings,
    diagnostics: &'a mut Diagnostics,
    table: TypeTable,
    scope_path: Vec<ScopeId>,
    return_types: HashMap<NodeId, TypeId>,
    function: Option<FunctionContext>,
    /// Operands of an odd number of enclosing unary minus signs.
    negated: HashSet<NodeId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        types: &'a mut TypeInterner,
        scopes: &'a ScopeTree,
        bindings: &'a Bindings,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        TypeChecker {
            types,
            scopes,
            bindings,
            diagnostics,
            table: TypeTable::new(),
            scope_path: vec![],
            return_types: HashMap::new(),
            function: None,
            negated: HashSet::new(),
        }
    }

    pub fn into_table(self) -> TypeTable {
        self.table
    }

    fn report(&mut self, error: Error) {
        self.diagnostics.report(error);
    }

    fn display(&self, ty: TypeId) -> String {
        self.types.display(ty).to_string()
    }

    fn record(&mut self, id: NodeId, ty: TypeId) -> Option<TypeId> {
        trace!(node = id.index(), ty = %self.types.display(ty), "expression typed");
        self.table.set_expr_type(id, ty);
        Some(ty)
    }

    fn record_error(&mut self, id: NodeId) -> Option<TypeId> {
        let error = self.types.error();
        self.record(id, error)
    }

    fn check_expr(&mut self, ast: &Ast, id: NodeId) -> TypeId {
        match self.visit(ast, id) {
            Some(ty) => ty,
            None => self.types.error(),
        }
    }

    fn type_of(&self, id: NodeId) -> TypeId {
        self.table
            .expr_type(id)
            .unwrap_or_else(|| self.types.error())
    }

    fn symbol_type(&self, symbol: SymbolId) -> TypeId {
        self.table
            .symbol_type(symbol)
            .unwrap_or_else(|| self.types.error())
    }

    fn current_scope(&self) -> Option<ScopeId> {
        self.scope_path.last().copied()
    }

    fn enter_scope(&mut self, owner: NodeId) {
        if let Some(scope) = self.scopes.scope_of(owner) {
            self.scope_path.push(scope);
        }
    }

    fn exit_scope(&mut self, owner: NodeId) {
        if self.scopes.scope_of(owner).is_some() {
            self.scope_path.pop();
        }
    }

    /// Replaces names that never resolved to a type with `Error`,
    /// reporting each one at `span`.
    fn resolve_type(&mut self, ty: TypeId, span: Span) -> TypeId {
        match self.types.get(ty).clone() {
            Type::Unresolved(name) => {
                self.report(Error::new(ErrorImpl::UnknownType { type_: name }, span));
                self.types.error()
            }
            Type::Function { ret, params } => {
                let ret = self.resolve_type(ret, span);
                let params: Vec<TypeId> = params
                    .into_iter()
                    .map(|param| self.resolve_type(param, span))
                    .collect();

                if self.types.is_error(ret) || params.iter().any(|p| self.types.is_error(*p)) {
                    self.types.error()
                } else {
                    ty
                }
            }
            _ => ty,
        }
    }

    /// Types every function signature up front so calls may precede the
    /// definition they call.
    fn declare_functions(&mut self, ast: &Ast, unit: &CompilationUnit) {
        for item in &unit.items {
            let NodeKind::FunctionDef(def) = ast.kind(*item) else {
                continue;
            };

            let body_scope = self.scopes.scope_of(def.body);
            let mut params = Vec::with_capacity(def.params.len());
            for (index, param) in def.params.iter().enumerate() {
                let ty = self.resolve_type(param.ty, param.type_span);
                params.push(ty);

                let symbol = body_scope
                    .and_then(|scope| self.scopes.lookup_local(scope, &param.name))
                    .filter(|symbol| {
                        self.scopes.symbol(*symbol).kind == SymbolKind::Parameter { index }
                            && self.scopes.symbol(*symbol).node == *item
                    });
                if let Some(symbol) = symbol {
                    self.table.set_symbol_type(symbol, ty);
                }
            }

            let return_type = match def.return_type_span {
                Some(span) => self.resolve_type(def.return_type, span),
                None => def.return_type,
            };
            self.return_types.insert(*item, return_type);

            let signature = self.types.function(return_type, params);
            if let Some(symbol) = self.bindings.declaration(*item) {
                self.table.set_symbol_type(symbol, signature);
            }
            debug!(function = %def.name, signature = %self.types.display(signature), "function declared");
        }
    }

    /// Gives `id` and the literal placeholders below it the concrete type
    /// `ty`. Nodes that already have a concrete type are left alone.
    fn rewrite(&mut self, ast: &Ast, id: NodeId, ty: TypeId) {
        let Some(current) = self.table.expr_type(id) else {
            return;
        };
        if current == ty || self.types.literal_kind(current).is_none() {
            return;
        }

        trace!(node = id.index(), ty = %self.types.display(ty), "placeholder rewritten");
        self.table.set_expr_type(id, ty);

        match ast.kind(id) {
            NodeKind::IntLiteral(lit) => self.check_literal_range(ast, id, lit, ty),
            // only the last element gives the sequence its value
            NodeKind::Comma(expr) => {
                if let Some(last) = expr.expressions.last() {
                    self.rewrite(ast, *last, ty);
                }
            }
            _ => {
                for child in ast.children(id) {
                    self.rewrite(ast, child, ty);
                }
            }
        }
    }

    /// Makes the type of `id` agree with `target`, rewriting literal
    /// placeholders. Fails when the types are incompatible; `Error` on
    /// either side always agrees.
    fn coerce_to(&mut self, ast: &Ast, id: NodeId, target: TypeId) -> bool {
        let actual = self.type_of(id);
        if self.types.is_error(actual) || self.types.is_error(target) {
            return true;
        }

        match self.types.coerce(actual, target) {
            Some(coerced) => {
                if coerced != actual {
                    debug!(
                        from = %self.types.display(actual),
                        to = %self.types.display(coerced),
                        "literal coerced"
                    );
                    self.rewrite(ast, id, coerced);
                }
                true
            }
            None => false,
        }
    }

    /// Settles every literal placeholder left below `id` on its default
    /// type. Runs when a statement is complete.
    fn default_literals(&mut self, ast: &Ast, id: NodeId) {
        for node in ast.descendants(id) {
            let Some(ty) = self.table.expr_type(node) else {
                continue;
            };
            if let Some(default) = self.types.default_type(ty) {
                debug!(node = node.index(), ty = %self.types.display(default), "literal defaulted");
                self.rewrite(ast, node, default);
            }
        }
    }

    fn check_literal_range(&mut self, ast: &Ast, id: NodeId, lit: &IntLiteral, ty: TypeId) {
        let Type::Int(kind) = *self.types.get(ty) else {
            return;
        };

        let negated = self.negated.contains(&id);
        let fits = lit.value().is_some_and(|value| match (negated, kind.is_signed()) {
            (false, _) => value <= kind.max_literal(),
            // `-128i8` spells its magnitude one past the positive maximum
            (true, true) => value <= kind.max_literal() + 1,
            (true, false) => value == 0,
        });
        if fits {
            return;
        }

        let digits = match lit.base {
            IntBase::Dec => lit.text.clone(),
            IntBase::Hex => format!("0x{}", lit.text),
            IntBase::Oct => format!("0o{}", lit.text),
            IntBase::Bin => format!("0b{}", lit.text),
        };
        let literal = if negated { format!("-{}", digits) } else { digits };
        self.report(Error::new(
            ErrorImpl::LiteralOutOfRange {
                literal,
                type_: kind.name().to_string(),
            },
            ast.span(id),
        ));
        let error = self.types.error();
        self.table.set_expr_type(id, error);
    }

    fn check_condition(&mut self, ast: &Ast, condition: NodeId, construct: &str) {
        self.check_expr(ast, condition);
        self.default_literals(ast, condition);

        let ty = self.type_of(condition);
        if !self.types.is_error(ty) && !self.types.is_bool(ty) {
            self.report(Error::new(
                ErrorImpl::NonBoolCondition {
                    construct: construct.to_string(),
                    received: self.display(ty),
                },
                ast.span(condition),
            ));
        }
    }

    /// Reports writes to constants and functions. Returns whether the
    /// write is allowed.
    fn check_assignable(&mut self, ast: &Ast, symbol: SymbolId, span: Span) -> bool {
        let declaration = self.scopes.symbol(symbol);
        if !declaration.is_constant(ast) {
            return true;
        }

        let mut error = Error::new(
            ErrorImpl::AssignToConstant {
                name: declaration.name.clone(),
            },
            span,
        )
        .with_extra_span(declaration.span, "declared here");
        if let Some((fix_span, replacement)) = declaration.mutable_fixit(ast) {
            error = error.with_fixit(fix_span, replacement);
        }
        self.report(error);
        false
    }

    /// Shared rules of `++`/`--` in both positions.
    fn check_increment(&mut self, ast: &Ast, id: NodeId, operand: NodeId, operator: &str) -> Option<TypeId> {
        let ty = self.check_expr(ast, operand);
        if self.types.is_error(ty) {
            return self.record_error(id);
        }

        if !matches!(ast.kind(operand), NodeKind::Identifier(_)) {
            self.report(Error::new(ErrorImpl::NotAssignable, ast.span(operand)));
            return self.record_error(id);
        }
        if let Some(symbol) = self.bindings.resolved(operand) {
            if !self.check_assignable(ast, symbol, ast.span(operand)) {
                return self.record_error(id);
            }
        }

        self.require_operand(ast, id, ty, operator, OperandClass::Numeric)
    }

    fn require_operand(
        &mut self,
        ast: &Ast,
        id: NodeId,
        ty: TypeId,
        operator: &str,
        class: OperandClass,
    ) -> Option<TypeId> {
        let operand = self.types.get(ty);
        let accepted = match class {
            OperandClass::Numeric => operand.is_integer_like() || operand.is_float_like(),
            OperandClass::Integer => operand.is_integer_like(),
            OperandClass::Bool => *operand == Type::Bool,
        };

        if accepted {
            return self.record(id, ty);
        }

        self.report(Error::new(
            ErrorImpl::UnaryOperandMismatch {
                operator: operator.to_string(),
                expected: class.describe().to_string(),
                received: self.display(ty),
            },
            ast.span(id),
        ));
        self.record_error(id)
    }
}

#[derive(Debug, Clone, Copy)]
enum OperandClass {
    Numeric,
    Integer,
    Bool,
}

impl OperandClass {
    fn describe(self) -> &'static str {
        match self {
            OperandClass::Numeric => "an integer or float",
            OperandClass::Integer => "an integer",
            OperandClass::Bool => "a bool",
        }
    }
}

impl ReturningVisitor for TypeChecker<'_> {
    type Output = Option<TypeId>;

    fn visit_compilation_unit(&mut self, ast: &Ast, id: NodeId, unit: &CompilationUnit) -> Option<TypeId> {
        self.enter_scope(id);
        self.declare_functions(ast, unit);
        for item in &unit.items {
            self.visit(ast, *item);
        }
        self.exit_scope(id);
        None
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, block: &BlockStmt) -> Option<TypeId> {
        self.enter_scope(id);
        for statement in &block.statements {
            self.visit(ast, *statement);
        }
        self.exit_scope(id);
        None
    }

    fn visit_expression_stmt(&mut self, ast: &Ast, _id: NodeId, stmt: &ExpressionStmt) -> Option<TypeId> {
        self.check_expr(ast, stmt.expression);
        self.default_literals(ast, stmt.expression);
        None
    }

    fn visit_var_decl(&mut self, ast: &Ast, id: NodeId, decl: &VarDecl) -> Option<TypeId> {
        let declared = decl
            .type_span
            .map(|span| self.resolve_type(decl.declared_type, span));

        let ty = match (declared, decl.initializer) {
            (Some(declared), Some(initializer)) => {
                let actual = self.check_expr(ast, initializer);
                if !self.coerce_to(ast, initializer, declared) {
                    self.report(Error::new(
                        ErrorImpl::VariableTypeMismatch {
                            expected: self.display(declared),
                            received: self.display(actual),
                        },
                        ast.span(initializer),
                    ));
                }
                self.default_literals(ast, initializer);
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(initializer)) => {
                self.check_expr(ast, initializer);
                self.default_literals(ast, initializer);

                let inferred = self.type_of(initializer);
                if self.types.is_void(inferred) {
                    self.report(Error::new(
                        ErrorImpl::CannotInferType {
                            variable: decl.name.clone(),
                        },
                        decl.name_span,
                    ));
                    self.types.error()
                } else {
                    debug!(variable = %decl.name, ty = %self.types.display(inferred), "variable type inferred");
                    inferred
                }
            }
            (None, None) => {
                self.report(Error::new(
                    ErrorImpl::CannotInferType {
                        variable: decl.name.clone(),
                    },
                    decl.name_span,
                ));
                self.types.error()
            }
        };

        // duplicates never made it into the scope, so match on the node too
        let symbol = self
            .current_scope()
            .and_then(|scope| self.scopes.lookup_local(scope, &decl.name))
            .filter(|symbol| self.scopes.symbol(*symbol).node == id);
        if let Some(symbol) = symbol {
            self.table.set_symbol_type(symbol, ty);
        }
        None
    }

    fn visit_if(&mut self, ast: &Ast, _id: NodeId, stmt: &IfStmt) -> Option<TypeId> {
        self.check_condition(ast, stmt.condition, "if");
        self.visit(ast, stmt.then_block);
        if let Some(else_branch) = stmt.else_branch {
            self.visit(ast, else_branch);
        }
        None
    }

    fn visit_while(&mut self, ast: &Ast, _id: NodeId, stmt: &WhileStmt) -> Option<TypeId> {
        self.check_condition(ast, stmt.condition, "while");
        self.visit(ast, stmt.body);
        None
    }

    fn visit_for(&mut self, ast: &Ast, id: NodeId, stmt: &ForStmt) -> Option<TypeId> {
        self.enter_scope(id);

        match stmt.init {
            Some(ForInit::Declaration(decl)) => {
                self.visit(ast, decl);
            }
            Some(ForInit::Expression(expr)) => {
                self.check_expr(ast, expr);
                self.default_literals(ast, expr);
            }
            None => {}
        }
        if let Some(condition) = stmt.condition {
            self.check_condition(ast, condition, "for");
        }
        if let Some(update) = stmt.update {
            self.check_expr(ast, update);
            self.default_literals(ast, update);
        }
        self.visit(ast, stmt.body);

        self.exit_scope(id);
        None
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId, stmt: &ReturnStmt) -> Option<TypeId> {
        let Some(function) = self.function.clone() else {
            return None;
        };
        let expected = function.return_type;

        match stmt.value {
            None => {
                if !self.types.is_void(expected) && !self.types.is_error(expected) {
                    self.report(Error::new(
                        ErrorImpl::EmptyReturn {
                            expected: self.display(expected),
                        },
                        ast.span(id),
                    ));
                }
            }
            Some(value) => {
                let actual = self.check_expr(ast, value);

                if self.types.is_void(expected) {
                    self.report(Error::new(
                        ErrorImpl::ValueReturnInVoid {
                            function: function.name,
                        },
                        ast.span(value),
                    ));
                } else if !self.coerce_to(ast, value, expected) {
                    self.report(Error::new(
                        ErrorImpl::ReturnTypeMismatch {
                            expected: self.display(expected),
                            received: self.display(actual),
                        },
                        ast.span(value),
                    ));
                }
                self.default_literals(ast, value);
            }
        }
        None
    }

    fn visit_function_def(&mut self, ast: &Ast, id: NodeId, def: &FunctionDef) -> Option<TypeId> {
        let return_type = self
            .return_types
            .get(&id)
            .copied()
            .unwrap_or(def.return_type);
        let enclosing = self.function.replace(FunctionContext {
            name: def.name.clone(),
            return_type,
        });

        self.enter_scope(def.body);
        if let NodeKind::Block(body) = ast.kind(def.body) {
            for statement in &body.statements {
                self.visit(ast, *statement);
            }
        }
        self.exit_scope(def.body);

        self.function = enclosing;
        None
    }

    fn visit_identifier(&mut self, _ast: &Ast, id: NodeId, _expr: &IdentifierExpr) -> Option<TypeId> {
        match self.bindings.resolved(id) {
            Some(symbol) => {
                let ty = self.symbol_type(symbol);
                self.record(id, ty)
            }
            None => self.record_error(id),
        }
    }

    fn visit_int_literal(&mut self, ast: &Ast, id: NodeId, lit: &IntLiteral) -> Option<TypeId> {
        match lit.suffix {
            Some(kind) => {
                let ty = self.types.int(kind);
                self.record(id, ty);
                self.check_literal_range(ast, id, lit, ty);
                Some(self.type_of(id))
            }
            None => {
                let ty = self.types.not_yet_inferred(InferKind::IntegerLiteral);
                self.record(id, ty)
            }
        }
    }

    fn visit_float_literal(&mut self, _ast: &Ast, id: NodeId, lit: &FloatLiteral) -> Option<TypeId> {
        let ty = match lit.suffix {
            Some(kind) => self.types.float(kind),
            None => self.types.not_yet_inferred(InferKind::FloatLiteral),
        };
        self.record(id, ty)
    }

    fn visit_bool_literal(&mut self, _ast: &Ast, id: NodeId, _lit: &BoolLiteral) -> Option<TypeId> {
        let ty = self.types.bool();
        self.record(id, ty)
    }

    fn visit_binary(&mut self, ast: &Ast, id: NodeId, expr: &BinaryExpr) -> Option<TypeId> {
        let left = self.check_expr(ast, expr.left);
        let right = self.check_expr(ast, expr.right);
        if self.types.is_error(left) || self.types.is_error(right) {
            return self.record_error(id);
        }

        let Some(operand) = self.types.coerce(left, right) else {
            self.report(Error::new(
                ErrorImpl::OperandTypeMismatch {
                    left: self.display(left),
                    right: self.display(right),
                },
                ast.span(id),
            ));
            return self.record_error(id);
        };
        self.rewrite(ast, expr.left, operand);
        self.rewrite(ast, expr.right, operand);

        match binary_result_type(self.types, expr.op, operand) {
            Some(result) => self.record(id, result),
            None => {
                self.report(Error::new(
                    ErrorImpl::UnresolvableOperator {
                        operator: expr.op.symbol().to_string(),
                        left: self.display(left),
                        right: self.display(right),
                    },
                    expr.op_span,
                ));
                self.record_error(id)
            }
        }
    }

    fn visit_assignment(&mut self, ast: &Ast, id: NodeId, expr: &AssignmentExpr) -> Option<TypeId> {
        let value = self.check_expr(ast, expr.value);
        let Some(symbol) = self.bindings.resolved(id) else {
            return self.record_error(id);
        };

        if !self.check_assignable(ast, symbol, expr.target_span) {
            return self.record_error(id);
        }

        let target = self.symbol_type(symbol);
        if self.types.is_error(target) || self.types.is_error(value) {
            return self.record_error(id);
        }

        if !self.coerce_to(ast, expr.value, target) {
            let error = match expr.op {
                Some(op) => ErrorImpl::UnresolvableOperator {
                    operator: format!("{}=", op.symbol()),
                    left: self.display(target),
                    right: self.display(value),
                },
                None => ErrorImpl::AssignmentTypeMismatch {
                    expected: self.display(target),
                    received: self.display(value),
                },
            };
            self.report(Error::new(error, ast.span(expr.value)));
            return self.record_error(id);
        }

        if let Some(op) = expr.op {
            if binary_result_type(self.types, op, target) != Some(target) {
                self.report(Error::new(
                    ErrorImpl::UnresolvableOperator {
                        operator: format!("{}=", op.symbol()),
                        left: self.display(target),
                        right: self.display(target),
                    },
                    ast.span(id),
                ));
                return self.record_error(id);
            }
        }

        self.record(id, target)
    }

    fn visit_prefix(&mut self, ast: &Ast, id: NodeId, expr: &PrefixExpr) -> Option<TypeId> {
        let operator = expr.op.symbol();
        if expr.op.mutates() {
            return self.check_increment(ast, id, expr.operand, operator);
        }

        // the sign reaching the operand: `-(-128)` is positive again
        let outer = self.negated.contains(&id);
        let inner = match expr.op {
            PrefixOp::Minus => !outer,
            PrefixOp::Plus => outer,
            _ => false,
        };
        if inner {
            self.negated.insert(expr.operand);
        }

        let ty = self.check_expr(ast, expr.operand);
        if self.types.is_error(ty) {
            return self.record_error(id);
        }

        let class = match expr.op {
            PrefixOp::Not => OperandClass::Bool,
            PrefixOp::BitNot => OperandClass::Integer,
            _ => OperandClass::Numeric,
        };
        self.require_operand(ast, id, ty, operator, class)
    }

    fn visit_postfix(&mut self, ast: &Ast, id: NodeId, expr: &PostfixExpr) -> Option<TypeId> {
        self.check_increment(ast, id, expr.operand, expr.op.symbol())
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId, expr: &CallExpr) -> Option<TypeId> {
        let arguments: Vec<TypeId> = expr
            .arguments
            .iter()
            .map(|argument| self.check_expr(ast, *argument))
            .collect();

        let Some(symbol) = self.bindings.resolved(id) else {
            return self.record_error(id);
        };
        let declaration = self.scopes.symbol(symbol);
        if !declaration.is_function() {
            self.report(Error::new(
                ErrorImpl::NotCallable {
                    name: expr.callee.clone(),
                },
                expr.callee_span,
            ));
            return self.record_error(id);
        }

        let Type::Function { ret, params } = self.types.get(self.symbol_type(symbol)).clone() else {
            return self.record_error(id);
        };

        if arguments.len() < params.len() {
            self.report(Error::new(
                ErrorImpl::MissingArguments {
                    expected: params.len(),
                    received: arguments.len(),
                },
                ast.span(id),
            ));
            return self.record_error(id);
        }
        if arguments.len() > params.len() {
            self.report(Error::new(
                ErrorImpl::UnexpectedArguments {
                    expected: params.len(),
                    received: arguments.len(),
                },
                ast.span(expr.arguments[params.len()]),
            ));
            return self.record_error(id);
        }

        let mut matched = true;
        for ((argument, actual), expected) in expr.arguments.iter().zip(arguments).zip(params) {
            if !self.coerce_to(ast, *argument, expected) {
                self.report(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        expected: self.display(expected),
                        received: self.display(actual),
                    },
                    ast.span(*argument),
                ));
                matched = false;
            }
        }

        if matched {
            self.record(id, ret)
        } else {
            self.record_error(id)
        }
    }

    fn visit_comma(&mut self, ast: &Ast, id: NodeId, expr: &CommaExpr) -> Option<TypeId> {
        let mut last = self.types.error();
        for expression in &expr.expressions {
            last = self.check_expr(ast, *expression);
        }
        self.record(id, last)
    }

    fn visit_cast(&mut self, ast: &Ast, id: NodeId, expr: &CastExpr) -> Option<TypeId> {
        let from = self.check_expr(ast, expr.operand);
        let to = self.resolve_type(expr.target, expr.target_span);
        if self.types.is_error(from) || self.types.is_error(to) {
            return self.record_error(id);
        }

        if !is_valid_cast(self.types, from, to) {
            self.report(Error::new(
                ErrorImpl::InvalidCast {
                    from: self.display(from),
                    to: self.display(to),
                },
                ast.span(id),
            ));
            return self.record_error(id);
        }

        self.record(id, to)
    }
}

/// Checks the types of a bound tree.
///
/// Every expression gets an entry in the returned table. Problems are
/// reported to `diagnostics` and the offending expression is typed
/// `Error`, which silences every check that depends on it.
pub fn type_check(
    ast: &Ast,
    types: &mut TypeInterner,
    scopes: &ScopeTree,
    bindings: &Bindings,
    diagnostics: &mut Diagnostics,
) -> TypeTable {
    info!(nodes = ast.len(), "type checking started");
    let errors_before = diagnostics.error_count();

    let mut checker = TypeChecker::new(types, scopes, bindings, diagnostics);
    if let Some(root) = ast.root() {
        checker.visit(ast, root);
    }
    let table = checker.into_table();

    info!(
        expressions = table.expr_count(),
        errors = diagnostics.error_count() - errors_before,
        "type checking finished"
    );
    table
}
