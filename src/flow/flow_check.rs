use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    ast::{
        statements::{
            BlockStmt, CompilationUnit, ExpressionStmt, ForStmt, FunctionDef, IfStmt, ReturnStmt,
            VarDecl, WhileStmt,
        },
        Ast, NodeId,
    },
    diagnostics::Diagnostics,
    errors::errors::{Error, ErrorImpl},
    types::{Type, TypeId, TypeInterner},
    visitor::ReturningVisitor,
};

/// Per function, whether every path through its body ends in a `return`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowInfo {
    always_returns: HashMap<NodeId, bool>,
}

impl FlowInfo {
    pub fn always_returns(&self, function: NodeId) -> Option<bool> {
        self.always_returns.get(&function).copied()
    }

    pub fn len(&self) -> usize {
        self.always_returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.always_returns.is_empty()
    }
}

/// Computes, bottom up, whether a statement returns on every path.
///
/// Loops never count as returning since their body may not run at all.
/// Conditions are not evaluated, so `while true { return 1; }` does not
/// count either.
pub struct FlowChecker<'a> {
    types: &'a TypeInterner,
    diagnostics: &'a mut Diagnostics,
    warn_unreachable: bool,
    info: FlowInfo,
}

impl<'a> FlowChecker<'a> {
    pub fn new(types: &'a TypeInterner, diagnostics: &'a mut Diagnostics, warn_unreachable: bool) -> Self {
        FlowChecker {
            types,
            diagnostics,
            warn_unreachable,
            info: FlowInfo::default(),
        }
    }

    pub fn into_info(self) -> FlowInfo {
        self.info
    }

    /// Void functions may fall off the end. Unknown return types were
    /// already reported and are not held against the body.
    fn must_return(&self, def: &FunctionDef) -> bool {
        !self.types.is_void(def.return_type) && !self.is_broken(def.return_type)
    }

    /// Whether `ty` names an unknown type anywhere inside it.
    fn is_broken(&self, ty: TypeId) -> bool {
        match self.types.get(ty) {
            Type::Error | Type::Unresolved(_) => true,
            Type::Function { ret, params } => {
                self.is_broken(*ret) || params.iter().any(|param| self.is_broken(*param))
            }
            _ => false,
        }
    }
}

impl ReturningVisitor for FlowChecker<'_> {
    type Output = bool;

    fn visit_compilation_unit(&mut self, ast: &Ast, _id: NodeId, unit: &CompilationUnit) -> bool {
        for item in &unit.items {
            self.visit(ast, *item);
        }
        false
    }

    fn visit_block(&mut self, ast: &Ast, _id: NodeId, block: &BlockStmt) -> bool {
        let mut returns = false;
        let mut warned = false;

        for statement in &block.statements {
            if returns && self.warn_unreachable && !warned {
                self.diagnostics
                    .report(Error::new(ErrorImpl::UnreachableCode, ast.span(*statement)));
                warned = true;
            }
            // later statements still get visited for nested diagnostics
            returns |= self.visit(ast, *statement);
        }

        returns
    }

    fn visit_expression_stmt(&mut self, _ast: &Ast, _id: NodeId, _stmt: &ExpressionStmt) -> bool {
        false
    }

    fn visit_var_decl(&mut self, _ast: &Ast, _id: NodeId, _decl: &VarDecl) -> bool {
        false
    }

    fn visit_if(&mut self, ast: &Ast, _id: NodeId, stmt: &IfStmt) -> bool {
        let then_returns = self.visit(ast, stmt.then_block);
        let else_returns = match stmt.else_branch {
            Some(else_branch) => self.visit(ast, else_branch),
            None => false,
        };

        then_returns && else_returns
    }

    fn visit_while(&mut self, ast: &Ast, _id: NodeId, stmt: &WhileStmt) -> bool {
        self.visit(ast, stmt.body);
        false
    }

    fn visit_for(&mut self, ast: &Ast, _id: NodeId, stmt: &ForStmt) -> bool {
        self.visit(ast, stmt.body);
        false
    }

    fn visit_return(&mut self, _ast: &Ast, _id: NodeId, _stmt: &ReturnStmt) -> bool {
        true
    }

    fn visit_function_def(&mut self, ast: &Ast, id: NodeId, def: &FunctionDef) -> bool {
        let returns = self.visit(ast, def.body);
        debug!(function = %def.name, returns, "function flow checked");
        self.info.always_returns.insert(id, returns);

        if !returns && self.must_return(def) {
            self.diagnostics.report(Error::new(
                ErrorImpl::MissingReturn {
                    function: def.name.clone(),
                },
                def.name_span,
            ));
        }

        false
    }
}

/// Checks that every function with a return type returns on all paths.
///
/// With `warn_unreachable`, the first statement after an all-paths return
/// in a block is reported as a warning.
pub fn flow_check(
    ast: &Ast,
    types: &TypeInterner,
    diagnostics: &mut Diagnostics,
    warn_unreachable: bool,
) -> FlowInfo {
    info!(warn_unreachable, "flow checking started");
    let errors_before = diagnostics.error_count();

    let mut checker = FlowChecker::new(types, diagnostics, warn_unreachable);
    if let Some(root) = ast.root() {
        checker.visit(ast, root);
    }
    let info = checker.into_info();

    info!(
        functions = info.len(),
        errors = diagnostics.error_count() - errors_before,
        "flow checking finished"
    );
    info
}
