use crate::{
    ast::{Ast, NodeId, NodeKind},
    diagnostics::Diagnostics,
    errors::errors::ErrorImpl,
    lexer::lexer::tokenize,
    parser::parse,
    types::{InferKind, TypeInterner},
    Span,
};

use super::{bind, Bindings, ScopeTree, SymbolKind};

struct Bound {
    ast: Ast,
    types: TypeInterner,
    scopes: ScopeTree,
    bindings: Bindings,
    diagnostics: Diagnostics,
}

fn bind_source(source: &str) -> Bound {
    let mut types = TypeInterner::new();
    let tokens = tokenize(source, 0).unwrap();
    let ast = parse(tokens, &mut types).unwrap();
    let mut diagnostics = Diagnostics::new();
    let (scopes, bindings) = bind(&ast, &mut diagnostics);

    Bound {
        ast,
        types,
        scopes,
        bindings,
        diagnostics,
    }
}

/// Use sites of `name`, in the order the parser created them.
fn uses_of(ast: &Ast, name: &str) -> Vec<NodeId> {
    ast.iter()
        .filter(|(_, node)| match &node.kind {
            NodeKind::Identifier(expr) => expr.name == name,
            NodeKind::Assignment(expr) => expr.target == name,
            NodeKind::Call(expr) => expr.callee == name,
            _ => false,
        })
        .map(|(id, _)| id)
        .collect()
}

fn functions(ast: &Ast) -> Vec<NodeId> {
    ast.iter()
        .filter(|(_, node)| matches!(node.kind, NodeKind::FunctionDef(_)))
        .map(|(id, _)| id)
        .collect()
}

#[test]
fn test_nested_scope_shadows_enclosing() {
    let bound = bind_source(
        "var x: i32 = 1; fn f() -> i32 { { var x: i32 = 2; x; } return x; }",
    );
    assert!(!bound.diagnostics.has_errors());

    let uses = uses_of(&bound.ast, "x");
    let inner = bound.bindings.resolved(uses[0]).unwrap();
    let outer = bound.bindings.resolved(uses[1]).unwrap();

    assert_eq!(bound.scopes.symbol(inner).kind, SymbolKind::LocalVariable);
    assert_eq!(bound.scopes.symbol(outer).kind, SymbolKind::GlobalVariable);

    let root = bound.scopes.scope_of(bound.ast.root().unwrap()).unwrap();
    assert_eq!(bound.scopes.lookup_local(root, "x"), Some(outer));
}

#[test]
fn test_self_reference_is_undefined() {
    for source in ["const x = x;", "fn f() { const y = y; }"] {
        let bound = bind_source(source);

        assert_eq!(bound.diagnostics.error_count(), 1, "source: {}", source);
        assert!(matches!(
            bound.diagnostics.first_error().unwrap().get_kind(),
            ErrorImpl::SymbolNotDeclared { .. }
        ));
    }
}

#[test]
fn test_duplicate_in_same_scope() {
    let bound = bind_source("fn f() { var a = 1; var a = 2; }");
    let error = bound.diagnostics.first_error().unwrap();

    assert_eq!(bound.diagnostics.error_count(), 1);
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::SymbolAlreadyDeclared {
            name: "a".to_string()
        }
    );
    assert_eq!(error.get_span(), Span::new(0, 24, 25));
    assert_eq!(error.get_extra_spans()[0].0, Span::new(0, 13, 14));
}

#[test]
fn test_same_name_in_nested_scopes() {
    let bound = bind_source("fn f() { var a = 1; { var a = 2; } while true { var a = 3; } }");

    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_parameters_share_the_body_scope() {
    let bound = bind_source("fn f(a: i32) { var a = 1; }");
    assert!(bound.diagnostics.contains("SymbolAlreadyDeclared"));

    let bound = bind_source("fn f(a: i32, a: i64) { }");
    assert!(bound.diagnostics.contains("SymbolAlreadyDeclared"));
}

#[test]
fn test_duplicate_globals_and_functions() {
    let bound = bind_source("var g: i32 = 0; fn g() { } fn h() { } fn h() { }");

    assert_eq!(bound.diagnostics.error_count(), 2);
}

#[test]
fn test_recursion_and_parameters() {
    let bound = bind_source("fn f(n: i32) -> i32 { return f(n); }");
    assert!(bound.diagnostics.is_empty());

    let function = functions(&bound.ast)[0];
    let call = uses_of(&bound.ast, "f")[0];
    let param = uses_of(&bound.ast, "n")[0];

    let callee = bound.bindings.resolved(call).unwrap();
    assert_eq!(bound.scopes.symbol(callee).kind, SymbolKind::Function);
    assert_eq!(bound.bindings.declaration(function), Some(callee));

    let param = bound.scopes.symbol(bound.bindings.resolved(param).unwrap());
    assert_eq!(param.kind, SymbolKind::Parameter { index: 0 });
    assert_eq!(param.node, function);
}

#[test]
fn test_forward_call_resolves() {
    let bound = bind_source("fn f() -> i32 { return g(); } fn g() -> i32 { return 1; }");
    assert!(bound.diagnostics.is_empty());

    let call = uses_of(&bound.ast, "g")[0];
    let g = functions(&bound.ast)[1];
    assert_eq!(
        bound.bindings.resolved(call),
        bound.bindings.declaration(g)
    );
}

#[test]
fn test_forward_global_is_undefined() {
    let bound = bind_source("fn f() -> i32 { return g; } var g: i32 = 1;");

    assert_eq!(bound.diagnostics.error_count(), 1);
    assert!(bound.diagnostics.contains("SymbolNotDeclared"));
}

#[test]
fn test_undefined_assignment_target() {
    let bound = bind_source("fn f() { y = 1; }");
    let error = bound.diagnostics.first_error().unwrap();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::SymbolNotDeclared {
            name: "y".to_string()
        }
    );
    assert_eq!(error.get_span(), Span::new(0, 9, 10));
}

#[test]
fn test_loop_variable_is_scoped_to_the_loop() {
    let bound = bind_source("fn f() { for (var i = 0; i < 1; i++) { i; } i; }");

    assert_eq!(bound.diagnostics.error_count(), 1);
    let uses = uses_of(&bound.ast, "i");
    assert!(uses[..uses.len() - 1]
        .iter()
        .all(|id| bound.bindings.resolved(*id).is_some()));
    assert!(bound.bindings.resolved(uses[uses.len() - 1]).is_none());
}

#[test]
fn test_binding_continues_after_errors() {
    let bound = bind_source("fn f() { a; b; } fn f() { c; }");

    assert_eq!(bound.diagnostics.error_count(), 4);
}

#[test]
fn test_scope_tree_shape() {
    let bound = bind_source("fn f() { { } for (;;) { } }");
    let root = bound.scopes.scope_of(bound.ast.root().unwrap()).unwrap();
    let function = functions(&bound.ast)[0];
    let NodeKind::FunctionDef(def) = bound.ast.kind(function) else {
        unreachable!()
    };
    let body = bound.scopes.scope_of(def.body).unwrap();

    // unit, function body, inner block, for, for body
    assert_eq!(bound.scopes.scope_count(), 5);
    assert_eq!(bound.scopes.parent(root), None);
    assert_eq!(bound.scopes.parent(body), Some(root));
    assert_eq!(bound.scopes.scope(body).owner, def.body);
    assert!(bound.scopes.scope_of(function).is_none());
}

#[test]
fn test_symbol_types_and_constness() {
    let mut bound = bind_source("fn f(x: i64, var y: u8) -> bool { const z = 1; return true; }");
    let function = functions(&bound.ast)[0];
    let NodeKind::FunctionDef(def) = bound.ast.kind(function) else {
        unreachable!()
    };
    let body = bound.scopes.scope_of(def.body).unwrap();
    let root = bound.scopes.parent(body).unwrap();

    let f = bound.scopes.symbol(bound.scopes.lookup_local(root, "f").unwrap());
    let ty = f.declared_type(&bound.ast, &mut bound.types);
    assert_eq!(bound.types.display(ty).to_string(), "fn(i64, u8) -> bool");
    assert!(f.is_constant(&bound.ast));
    assert_eq!(f.mutable_fixit(&bound.ast), None);

    let x = bound.scopes.symbol(bound.scopes.lookup_local(body, "x").unwrap());
    assert!(x.is_constant(&bound.ast));
    assert_eq!(
        x.mutable_fixit(&bound.ast),
        Some((Span::point(0, 5), "var "))
    );

    let y = bound.scopes.symbol(bound.scopes.lookup_local(body, "y").unwrap());
    assert!(!y.is_constant(&bound.ast));
    let y_type = y.declared_type(&bound.ast, &mut bound.types);
    assert_eq!(bound.types.display(y_type).to_string(), "u8");

    let z = bound.scopes.symbol(bound.scopes.lookup_local(body, "z").unwrap());
    assert!(z.is_constant(&bound.ast));
    assert_eq!(
        z.declared_type(&bound.ast, &mut bound.types),
        bound.types.not_yet_inferred(InferKind::VariableDeclaration)
    );
}
