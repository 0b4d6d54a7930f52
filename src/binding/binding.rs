use std::collections::HashMap;

use tracing::{debug, info, trace};

use crate::{
    ast::{
        expressions::{AssignmentExpr, CallExpr, IdentifierExpr},
        statements::{BlockStmt, CompilationUnit, ForStmt, FunctionDef, VarDecl, VariableScope},
        Ast, NodeId,
    },
    diagnostics::Diagnostics,
    errors::errors::{Error, ErrorImpl},
    visitor::{walk_children, Visitor},
    Span,
};

use super::scope::{ScopeId, ScopeTree, SymbolDeclaration, SymbolId, SymbolKind};

/// Which symbol each name in the tree stands for.
///
/// Use sites are identifiers, assignments (their target) and calls (their
/// callee). Declaration sites are variable declarations and function
/// definitions. Names that failed to bind have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    uses: HashMap<NodeId, SymbolId>,
    declarations: HashMap<NodeId, SymbolId>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The symbol a use site refers to.
    pub fn resolved(&self, node: NodeId) -> Option<SymbolId> {
        self.uses.get(&node).copied()
    }

    /// The symbol a declaration introduced.
    pub fn declaration(&self, node: NodeId) -> Option<SymbolId> {
        self.declarations.get(&node).copied()
    }

    pub fn use_count(&self) -> usize {
        self.uses.len()
    }
}

/// A name that did not resolve where it was used.
struct PendingUse {
    node: NodeId,
    name: String,
    span: Span,
}

struct Binder<'d> {
    scopes: ScopeTree,
    bindings: Bindings,
    scope_path: Vec<ScopeId>,
    pending: Vec<PendingUse>,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Binder<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Binder {
            scopes: ScopeTree::new(),
            bindings: Bindings::new(),
            scope_path: vec![],
            pending: vec![],
            diagnostics,
        }
    }

    fn current_scope(&self) -> Option<ScopeId> {
        self.scope_path.last().copied()
    }

    fn enter_scope(&mut self, owner: NodeId) -> ScopeId {
        let scope = self.scopes.create_scope(self.current_scope(), owner);
        debug!(scope = scope.index(), owner = owner.index(), "scope created");
        self.scope_path.push(scope);
        scope
    }

    fn exit_scope(&mut self) {
        self.scope_path.pop();
    }

    fn define(&mut self, name: &str, kind: SymbolKind, node: NodeId, span: Span) -> Option<SymbolId> {
        let scope = self.current_scope()?;
        let symbol = SymbolDeclaration {
            name: name.to_string(),
            kind,
            node,
            span,
            scope,
        };

        match self.scopes.define(symbol) {
            Ok(id) => {
                debug!(name, kind = ?kind, scope = scope.index(), "symbol defined");
                Some(id)
            }
            Err(existing) => {
                let previous = self.scopes.symbol(existing).span;
                self.diagnostics.report(
                    Error::new(
                        ErrorImpl::SymbolAlreadyDeclared {
                            name: name.to_string(),
                        },
                        span,
                    )
                    .with_extra_span(previous, "previously declared here"),
                );
                None
            }
        }
    }

    /// Binds a use of `name` at `node`, or parks it until the whole unit
    /// has been seen.
    fn resolve(&mut self, node: NodeId, name: &str, span: Span) {
        let Some(scope) = self.current_scope() else {
            return;
        };

        match self.scopes.resolve(scope, name) {
            Some(symbol) => {
                trace!(name, symbol = symbol.index(), "name resolved");
                self.bindings.uses.insert(node, symbol);
            }
            None => self.pending.push(PendingUse {
                node,
                name: name.to_string(),
                span,
            }),
        }
    }

    /// Retries parked uses against the unit's scope. Only functions may be
    /// used ahead of their definition; anything else stays undefined.
    fn resolve_pending(&mut self, root: ScopeId) {
        for pending in std::mem::take(&mut self.pending) {
            let symbol = self
                .scopes
                .lookup_local(root, &pending.name)
                .filter(|symbol| self.scopes.symbol(*symbol).is_function());

            match symbol {
                Some(symbol) => {
                    trace!(name = %pending.name, "forward reference resolved");
                    self.bindings.uses.insert(pending.node, symbol);
                }
                None => self.diagnostics.report(Error::new(
                    ErrorImpl::SymbolNotDeclared { name: pending.name },
                    pending.span,
                )),
            }
        }
    }
}

impl Visitor for Binder<'_> {
    fn visit_compilation_unit(&mut self, ast: &Ast, id: NodeId, _unit: &CompilationUnit) {
        let root = self.enter_scope(id);
        walk_children(self, ast, id);
        self.resolve_pending(root);
        self.exit_scope();
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &BlockStmt) {
        self.enter_scope(id);
        walk_children(self, ast, id);
        self.exit_scope();
    }

    fn visit_function_def(&mut self, ast: &Ast, id: NodeId, def: &FunctionDef) {
        // defined outside its own scope so the body can call it
        if let Some(symbol) = self.define(&def.name, SymbolKind::Function, id, def.name_span) {
            self.bindings.declarations.insert(id, symbol);
        }

        // parameters and the body's own declarations share one scope
        self.enter_scope(def.body);
        for (index, param) in def.params.iter().enumerate() {
            self.define(
                &param.name,
                SymbolKind::Parameter { index },
                id,
                param.name_span,
            );
        }
        walk_children(self, ast, def.body);
        self.exit_scope();
    }

    fn visit_var_decl(&mut self, ast: &Ast, id: NodeId, decl: &VarDecl) {
        // the initializer cannot see the name it initializes
        walk_children(self, ast, id);

        let kind = match decl.scope {
            VariableScope::Global => SymbolKind::GlobalVariable,
            VariableScope::Local => SymbolKind::LocalVariable,
        };
        if let Some(symbol) = self.define(&decl.name, kind, id, decl.name_span) {
            self.bindings.declarations.insert(id, symbol);
        }
    }

    fn visit_for(&mut self, ast: &Ast, id: NodeId, _stmt: &ForStmt) {
        // the loop variable lives in a scope around the body
        self.enter_scope(id);
        walk_children(self, ast, id);
        self.exit_scope();
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId, expr: &IdentifierExpr) {
        self.resolve(id, &expr.name, ast.span(id));
    }

    fn visit_assignment(&mut self, ast: &Ast, id: NodeId, expr: &AssignmentExpr) {
        self.resolve(id, &expr.target, expr.target_span);
        walk_children(self, ast, id);
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId, expr: &CallExpr) {
        self.resolve(id, &expr.callee, expr.callee_span);
        walk_children(self, ast, id);
    }
}

/// Builds the scope tree of `ast` and resolves every name in it.
///
/// Duplicate declarations and undefined names are reported to
/// `diagnostics`; binding always runs over the whole tree.
pub fn bind(ast: &Ast, diagnostics: &mut Diagnostics) -> (ScopeTree, Bindings) {
    info!(nodes = ast.len(), "binding started");
    let errors_before = diagnostics.error_count();

    let mut binder = Binder::new(diagnostics);
    if let Some(root) = ast.root() {
        binder.visit(ast, root);
    }
    let Binder {
        scopes, bindings, ..
    } = binder;

    info!(
        scopes = scopes.scope_count(),
        symbols = scopes.symbol_count(),
        errors = diagnostics.error_count() - errors_before,
        "binding finished"
    );

    (scopes, bindings)
}
