use std::collections::HashMap;

use crate::{
    ast::{statements::Constness, Ast, NodeId, NodeKind},
    types::{TypeId, TypeInterner},
    Span,
};

/// Handle to a [`Scope`] in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a [`SymbolDeclaration`] in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    GlobalVariable,
    LocalVariable,
    /// The declaring node is the function; `index` picks the parameter.
    Parameter { index: usize },
}

/// What a name is bound to.
///
/// Type and constness are not stored here; they are read from the
/// declaring node when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDeclaration {
    pub name: String,
    pub kind: SymbolKind,
    pub node: NodeId,
    /// Span of the declared name.
    pub span: Span,
    pub scope: ScopeId,
}

impl SymbolDeclaration {
    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }

    /// The type the declaration was written with.
    ///
    /// Functions yield their signature, variables their annotation or the
    /// `NotYetInferred` placeholder when they have none.
    pub fn declared_type(&self, ast: &Ast, types: &mut TypeInterner) -> TypeId {
        match (self.kind, ast.kind(self.node)) {
            (SymbolKind::Function, NodeKind::FunctionDef(def)) => {
                let params = def.params.iter().map(|param| param.ty).collect();
                types.function(def.return_type, params)
            }
            (SymbolKind::Parameter { index }, NodeKind::FunctionDef(def)) => def
                .params
                .get(index)
                .map(|param| param.ty)
                .unwrap_or_else(|| types.error()),
            (_, NodeKind::VarDecl(decl)) => decl.declared_type,
            _ => types.error(),
        }
    }

    /// Functions are never assignable; variables and parameters follow
    /// their `const`/`var` keyword.
    pub fn is_constant(&self, ast: &Ast) -> bool {
        match (self.kind, ast.kind(self.node)) {
            (SymbolKind::Parameter { index }, NodeKind::FunctionDef(def)) => def
                .params
                .get(index)
                .map_or(true, |param| param.constness == Constness::Const),
            (_, NodeKind::VarDecl(decl)) => decl.constness == Constness::Const,
            _ => true,
        }
    }

    /// Where to edit the declaration to make it mutable, and the edit.
    pub fn mutable_fixit(&self, ast: &Ast) -> Option<(Span, &'static str)> {
        match (self.kind, ast.kind(self.node)) {
            (SymbolKind::Parameter { .. }, _) => {
                Some((Span::point(self.span.file, self.span.start), "var "))
            }
            (_, NodeKind::VarDecl(decl)) => Some((decl.keyword_span, "var")),
            _ => None,
        }
    }
}

/// One lexical binding context.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// The compilation unit or block that opened the scope.
    pub owner: NodeId,
    symbols: HashMap<String, SymbolId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, owner: NodeId) -> Self {
        Scope {
            parent,
            owner,
            symbols: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Every scope and symbol of one compilation unit.
///
/// Scopes form a tree through their parent links; the compilation unit's
/// scope is the only one without a parent. The tree is built once by the
/// binding pass and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<SymbolDeclaration>,
    by_node: HashMap<NodeId, ScopeId>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope for `owner` and attaches it to that node.
    pub fn create_scope(&mut self, parent: Option<ScopeId>, owner: NodeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(parent, owner));
        self.by_node.insert(owner, id);
        id
    }

    /// Binds `symbol.name` in `symbol.scope`.
    ///
    /// Fails with the existing binding when the name is already taken in
    /// that same scope. Enclosing scopes are not consulted, so shadowing is
    /// always allowed.
    pub fn define(&mut self, symbol: SymbolDeclaration) -> Result<SymbolId, SymbolId> {
        let scope = symbol.scope;
        if let Some(existing) = self.lookup_local(scope, &symbol.name) {
            return Err(existing);
        }

        let id = SymbolId(self.symbols.len() as u32);
        self.scopes[scope.index()]
            .symbols
            .insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.index()].get(name)
    }

    /// Looks `name` up in `scope` and then in each enclosing scope.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }

        None
    }

    /// The scope a compilation unit or block opened, if any.
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.by_node.get(&node).copied()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.index()].parent
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolDeclaration {
        &self.symbols[id.index()]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &SymbolDeclaration)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}
