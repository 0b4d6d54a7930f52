//! Unit tests for the parser module.
//!
//! - Global and local declarations
//! - Function definitions and parameters
//! - Operator precedence and associativity
//! - Literals in every base
//! - Control flow statements
//! - Type annotations and syntax errors

use crate::{
    ast::{
        expressions::{BinaryOp, IntBase, PostfixOp, PrefixOp},
        statements::{Constness, ForInit, VariableScope, Visibility},
        Ast, NodeId, NodeKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    types::{FloatKind, InferKind, IntKind, Type, TypeInterner},
    Span,
};

use super::parser::parse;

fn parse_source(source: &str) -> (Ast, TypeInterner) {
    let mut types = TypeInterner::new();
    let tokens = tokenize(source, 0).unwrap();
    let ast = parse(tokens, &mut types).unwrap();
    (ast, types)
}

fn parse_error(source: &str) -> Error {
    let mut types = TypeInterner::new();
    let tokens = tokenize(source, 0).unwrap();
    parse(tokens, &mut types).unwrap_err()
}

fn items(ast: &Ast) -> Vec<NodeId> {
    match ast.kind(ast.root().unwrap()) {
        NodeKind::CompilationUnit(unit) => unit.items.clone(),
        other => panic!("root is not a compilation unit: {:?}", other),
    }
}

fn function_body(ast: &Ast, function: NodeId) -> Vec<NodeId> {
    let NodeKind::FunctionDef(def) = ast.kind(function) else {
        panic!("not a function");
    };
    let NodeKind::Block(block) = ast.kind(def.body) else {
        panic!("function body is not a block");
    };
    block.statements.clone()
}

/// Parses `expr` as the only statement of a function and returns it.
fn parse_expression(expr: &str) -> (Ast, TypeInterner, NodeId) {
    let (ast, types) = parse_source(&format!("fn test() {{ {}; }}", expr));
    let statement = function_body(&ast, items(&ast)[0])[0];
    let NodeKind::ExpressionStmt(stmt) = ast.kind(statement) else {
        panic!("not an expression statement");
    };
    let expression = stmt.expression;
    (ast, types, expression)
}

fn binary(ast: &Ast, id: NodeId) -> (BinaryOp, NodeId, NodeId) {
    match ast.kind(id) {
        NodeKind::Binary(expr) => (expr.op, expr.left, expr.right),
        other => panic!("expected a binary expression, found {:?}", other),
    }
}

#[test]
fn test_parse_global_declaration() {
    let (ast, types) = parse_source("pub var x: i32 = 42;");
    let decl = items(&ast)[0];

    let NodeKind::VarDecl(var) = ast.kind(decl) else {
        panic!("expected a declaration");
    };
    assert_eq!(var.visibility, Visibility::Public);
    assert_eq!(var.constness, Constness::Var);
    assert_eq!(var.scope, VariableScope::Global);
    assert_eq!(var.declared_type, types.int(IntKind::I32));
    assert_eq!(var.name, "x");
    assert_eq!(var.name_span, Span::new(0, 8, 9));
    // `pub` through `;`
    assert_eq!(ast.span(decl), Span::new(0, 0, 20));

    let NodeKind::IntLiteral(literal) = ast.kind(var.initializer.unwrap()) else {
        panic!("expected an integer literal");
    };
    assert_eq!(literal.text, "42");
    assert_eq!(literal.base, IntBase::Dec);
    assert_eq!(literal.suffix, None);
}

#[test]
fn test_parse_untyped_declaration() {
    let (ast, types) = parse_source("const x = 1;");

    let NodeKind::VarDecl(var) = ast.kind(items(&ast)[0]) else {
        panic!("expected a declaration");
    };
    assert_eq!(var.visibility, Visibility::Private);
    assert_eq!(
        var.declared_type,
        types.not_yet_inferred(InferKind::VariableDeclaration)
    );
    assert_eq!(var.type_span, None);
}

#[test]
fn test_parse_const_requires_initializer() {
    let err = parse_error("const x: i32;");

    assert!(matches!(
        err.get_kind(),
        ErrorImpl::UnexpectedTokenDetailed { message, .. } if message == "expected rhs in constant definition"
    ));
}

#[test]
fn test_parse_function_definition() {
    let (ast, types) = parse_source("fn add(a: i32, var b: i64) -> bool { return a < b; }");

    let NodeKind::FunctionDef(def) = ast.kind(items(&ast)[0]) else {
        panic!("expected a function");
    };
    assert_eq!(def.name, "add");
    assert_eq!(def.visibility, Visibility::Private);
    assert_eq!(def.params.len(), 2);
    assert_eq!(def.params[0].constness, Constness::Const);
    assert_eq!(def.params[1].constness, Constness::Var);
    assert_eq!(def.params[1].ty, types.int(IntKind::I64));
    assert_eq!(def.return_type, types.bool());

    let body = function_body(&ast, items(&ast)[0]);
    assert!(matches!(ast.kind(body[0]), NodeKind::Return(ret) if ret.value.is_some()));
}

#[test]
fn test_parse_missing_return_type_is_void() {
    let (ast, types) = parse_source("pub fn main() {}");

    let NodeKind::FunctionDef(def) = ast.kind(items(&ast)[0]) else {
        panic!("expected a function");
    };
    assert_eq!(def.visibility, Visibility::Public);
    assert_eq!(def.return_type, types.void());
    assert_eq!(def.return_type_span, None);
}

#[test]
fn test_parse_precedence() {
    let (ast, _, expr) = parse_expression("x = 1 + 2 * 3");

    let NodeKind::Assignment(assignment) = ast.kind(expr) else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.target, "x");
    assert_eq!(assignment.op, None);

    let (op, _, right) = binary(&ast, assignment.value);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(binary(&ast, right).0, BinaryOp::Mul);
}

#[test]
fn test_parse_comparison_binds_tighter_than_logical() {
    let (ast, _, expr) = parse_expression("a < b && c == d || e");

    let (op, left, _) = binary(&ast, expr);
    assert_eq!(op, BinaryOp::LogicalOr);

    let (op, left, right) = binary(&ast, left);
    assert_eq!(op, BinaryOp::LogicalAnd);
    assert_eq!(binary(&ast, left).0, BinaryOp::Less);
    assert_eq!(binary(&ast, right).0, BinaryOp::Equals);
}

#[test]
fn test_parse_bitwise_and_shift_precedence() {
    let (ast, _, expr) = parse_expression("a | b ^ c & d << 1");

    let (op, _, right) = binary(&ast, expr);
    assert_eq!(op, BinaryOp::BitOr);
    let (op, _, right) = binary(&ast, right);
    assert_eq!(op, BinaryOp::BitXor);
    let (op, _, right) = binary(&ast, right);
    assert_eq!(op, BinaryOp::BitAnd);
    assert_eq!(binary(&ast, right).0, BinaryOp::ShiftLeft);
}

#[test]
fn test_parse_binary_is_left_associative() {
    let (ast, _, expr) = parse_expression("a - b - c");

    let (op, left, right) = binary(&ast, expr);
    assert_eq!(op, BinaryOp::Sub);
    assert!(matches!(ast.kind(right), NodeKind::Identifier(ident) if ident.name == "c"));
    assert_eq!(binary(&ast, left).0, BinaryOp::Sub);
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let (ast, _, expr) = parse_expression("a = b += 1");

    let NodeKind::Assignment(outer) = ast.kind(expr) else {
        panic!("expected an assignment");
    };
    assert_eq!(outer.target, "a");

    let NodeKind::Assignment(inner) = ast.kind(outer.value) else {
        panic!("expected a nested assignment");
    };
    assert_eq!(inner.target, "b");
    assert_eq!(inner.op, Some(BinaryOp::Add));
}

#[test]
fn test_parse_assignment_target_must_be_a_name() {
    let err = parse_error("fn f() { 1 = 2; }");

    assert_eq!(err.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(err.get_span(), Span::new(0, 9, 10));
}

#[test]
fn test_parse_comma_is_flattened() {
    let (ast, _, expr) = parse_expression("a, b = 1, c");

    let NodeKind::Comma(comma) = ast.kind(expr) else {
        panic!("expected a comma expression");
    };
    assert_eq!(comma.expressions.len(), 3);
    assert!(matches!(ast.kind(comma.expressions[1]), NodeKind::Assignment(_)));
}

#[test]
fn test_parse_call_leaves_no_orphans() {
    let (ast, _) = parse_source("fn g() { f(1, 2); }");

    // two literals, the call, the statement, the block, the function, the unit
    assert_eq!(ast.len(), 7);

    let statement = function_body(&ast, items(&ast)[0])[0];
    let NodeKind::ExpressionStmt(stmt) = ast.kind(statement) else {
        panic!("expected an expression statement");
    };
    let NodeKind::Call(call) = ast.kind(stmt.expression) else {
        panic!("expected a call");
    };
    assert_eq!(call.callee, "f");
    assert_eq!(call.callee_span, Span::new(0, 9, 10));
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(ast.span(stmt.expression), Span::new(0, 9, 16));
}

#[test]
fn test_parse_cast_binds_tighter_than_additive() {
    let (ast, types, expr) = parse_expression("a + b as i64 as f64");

    let (op, _, right) = binary(&ast, expr);
    assert_eq!(op, BinaryOp::Add);

    let NodeKind::Cast(outer) = ast.kind(right) else {
        panic!("expected a cast");
    };
    assert_eq!(outer.target, types.float(FloatKind::F64));
    assert!(matches!(ast.kind(outer.operand), NodeKind::Cast(inner) if inner.target == types.int(IntKind::I64)));
}

#[test]
fn test_parse_prefix_and_postfix() {
    let (ast, _, expr) = parse_expression("-x++");

    let NodeKind::Prefix(prefix) = ast.kind(expr) else {
        panic!("expected a prefix expression");
    };
    assert_eq!(prefix.op, PrefixOp::Minus);
    assert!(matches!(
        ast.kind(prefix.operand),
        NodeKind::Postfix(postfix) if postfix.op == PostfixOp::Increment
    ));
}

#[test]
fn test_parse_literal_bases_and_suffixes() {
    let (ast, _) = parse_source("const a = 0xFF_u8; const b = 0b1010; const c = 0o17; const d = 7f32;");
    let decls = items(&ast);

    let initializer = |decl: NodeId| match ast.kind(decl) {
        NodeKind::VarDecl(var) => var.initializer.unwrap(),
        _ => panic!("expected a declaration"),
    };

    let NodeKind::IntLiteral(hex) = ast.kind(initializer(decls[0])) else {
        panic!("expected an integer literal");
    };
    assert_eq!(hex.base, IntBase::Hex);
    assert_eq!(hex.suffix, Some(IntKind::U8));
    assert_eq!(hex.text, "FF");
    assert_eq!(hex.value(), Some(255));

    let NodeKind::IntLiteral(bin) = ast.kind(initializer(decls[1])) else {
        panic!("expected an integer literal");
    };
    assert_eq!(bin.base, IntBase::Bin);
    assert_eq!(bin.value(), Some(10));

    let NodeKind::IntLiteral(oct) = ast.kind(initializer(decls[2])) else {
        panic!("expected an integer literal");
    };
    assert_eq!(oct.value(), Some(15));

    let NodeKind::FloatLiteral(float) = ast.kind(initializer(decls[3])) else {
        panic!("expected a float literal");
    };
    assert_eq!(float.suffix, Some(FloatKind::F32));
    assert_eq!(float.text, "7");
}

#[test]
fn test_parse_for_clauses() {
    let (ast, _) = parse_source("fn f() { for (var i = 0; i < 10; i++) {} for (;;) {} }");
    let body = function_body(&ast, items(&ast)[0]);

    let NodeKind::For(full) = ast.kind(body[0]) else {
        panic!("expected a for loop");
    };
    assert!(matches!(full.init, Some(ForInit::Declaration(_))));
    assert!(full.condition.is_some());
    assert!(full.update.is_some());

    let NodeKind::For(empty) = ast.kind(body[1]) else {
        panic!("expected a for loop");
    };
    assert_eq!(empty.init, None);
    assert_eq!(empty.condition, None);
    assert_eq!(empty.update, None);
}

#[test]
fn test_parse_for_expression_init() {
    let (ast, _) = parse_source("fn f() { var i: i32; for (i = 0; i < 3; ++i) {} }");
    let body = function_body(&ast, items(&ast)[0]);

    let NodeKind::For(stmt) = ast.kind(body[1]) else {
        panic!("expected a for loop");
    };
    assert!(matches!(stmt.init, Some(ForInit::Expression(_))));
}

#[test]
fn test_parse_else_if_chain() {
    let (ast, _) = parse_source(
        "fn f(c: bool) -> i32 { if c { return 1; } else if !c { return 2; } else { return 3; } }",
    );
    let body = function_body(&ast, items(&ast)[0]);

    let NodeKind::If(stmt) = ast.kind(body[0]) else {
        panic!("expected an if statement");
    };
    let NodeKind::If(nested) = ast.kind(stmt.else_branch.unwrap()) else {
        panic!("expected else-if");
    };
    assert!(matches!(
        ast.kind(nested.else_branch.unwrap()),
        NodeKind::Block(_)
    ));
}

#[test]
fn test_parse_if_requires_block() {
    let err = parse_error("fn f(c: bool) { if c return; }");

    assert_eq!(err.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_function_and_unknown_types() {
    let (ast, mut types) = parse_source("var f: fn(i32, bool) -> i64; var p: Point;");
    let decls = items(&ast);

    let i32_ = types.int(IntKind::I32);
    let bool_ = types.bool();
    let i64_ = types.int(IntKind::I64);
    let expected = types.function(i64_, vec![i32_, bool_]);

    let NodeKind::VarDecl(f) = ast.kind(decls[0]) else {
        panic!("expected a declaration");
    };
    assert_eq!(f.declared_type, expected);

    let NodeKind::VarDecl(p) = ast.kind(decls[1]) else {
        panic!("expected a declaration");
    };
    assert_eq!(types.get(p.declared_type), &Type::Unresolved("Point".to_string()));
}

#[test]
fn test_parse_rejects_statements_at_top_level() {
    let err = parse_error("x = 1;");

    assert!(matches!(
        err.get_kind(),
        ErrorImpl::UnexpectedTokenDetailed { token, .. } if token == "x"
    ));
}

#[test]
fn test_parse_rejects_nested_functions() {
    let err = parse_error("fn outer() { fn inner() {} }");

    assert_eq!(err.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_empty_statements_are_skipped() {
    let (ast, _) = parse_source("fn f() { ;; return; ; }");

    assert_eq!(function_body(&ast, items(&ast)[0]).len(), 1);
}
