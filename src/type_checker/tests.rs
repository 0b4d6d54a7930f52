use crate::{
    ast::{expressions::BinaryOp, Ast, NodeId, NodeKind},
    binding::{bind, Bindings, ScopeTree},
    diagnostics::Diagnostics,
    errors::errors::ErrorImpl,
    lexer::lexer::tokenize,
    parser::parse,
    types::{IntKind, TypeInterner},
    visitor::AstStringifier,
    Span,
};

use super::{binary_result_type, is_valid_cast, type_check, TypeTable};

struct Checked {
    ast: Ast,
    types: TypeInterner,
    scopes: ScopeTree,
    bindings: Bindings,
    table: TypeTable,
    diagnostics: Diagnostics,
}

impl Checked {
    fn errors(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|error| error.get_error_name())
            .collect()
    }

    fn type_name(&self, id: NodeId) -> String {
        let ty = self.table.expr_type(id).expect("expression has no type");
        self.types.display(ty).to_string()
    }

    /// The first node whose kind has the given name.
    fn node(&self, name: &str) -> NodeId {
        self.nodes(name)[0]
    }

    fn nodes(&self, name: &str) -> Vec<NodeId> {
        self.ast
            .iter()
            .filter(|(_, node)| node.kind.name() == name)
            .map(|(id, _)| id)
            .collect()
    }

    fn int_literal(&self, text: &str) -> NodeId {
        self.ast
            .iter()
            .find(|(_, node)| matches!(&node.kind, NodeKind::IntLiteral(lit) if lit.text == text))
            .map(|(id, _)| id)
            .expect("no such literal")
    }

    fn variable_type(&self, name: &str) -> String {
        let (symbol, _) = self
            .scopes
            .symbols()
            .find(|(_, symbol)| symbol.name == name)
            .expect("no such symbol");
        let ty = self.table.symbol_type(symbol).expect("symbol has no type");
        self.types.display(ty).to_string()
    }
}

fn check(source: &str) -> Checked {
    let mut types = TypeInterner::new();
    let tokens = tokenize(source, 0).unwrap();
    let ast = parse(tokens, &mut types).unwrap();
    let mut diagnostics = Diagnostics::new();
    let (scopes, bindings) = bind(&ast, &mut diagnostics);
    let table = type_check(&ast, &mut types, &scopes, &bindings, &mut diagnostics);

    Checked {
        ast,
        types,
        scopes,
        bindings,
        table,
        diagnostics,
    }
}

#[test]
fn test_literal_takes_declared_type() {
    let checked = check("const x: i32 = 5;");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.int_literal("5")), "i32");
    assert_eq!(checked.variable_type("x"), "i32");
}

#[test]
fn test_integer_float_operands_mismatch() {
    let checked = check("const x: i32 = 5; const y = x + 2.0f32;");

    assert_eq!(checked.errors(), vec!["OperandTypeMismatch"]);
    assert_eq!(checked.variable_type("y"), "<error>");
}

#[test]
fn test_binary_result_types() {
    let checked = check("fn f(a: i32, b: bool) { a < 1; a & 3; b && true; a == 2; }");
    let binaries = checked.nodes("BinaryExpression");

    assert!(checked.diagnostics.is_empty());
    let names: Vec<String> = binaries.iter().map(|id| checked.type_name(*id)).collect();
    assert_eq!(names, vec!["bool", "i32", "bool", "bool"]);
}

#[test]
fn test_binary_rejections() {
    let checked = check("fn f(a: i32, b: bool) { a + b; true + false; 1.0 | 2.0; a && a; }");

    assert_eq!(
        checked.errors(),
        vec![
            "OperandTypeMismatch",
            "UnresolvableOperator",
            "UnresolvableOperator",
            "UnresolvableOperator",
        ]
    );
}

#[test]
fn test_binary_operation_table() {
    let types = TypeInterner::new();
    let int = types.int(IntKind::U32);
    let float = types.float(crate::types::FloatKind::F64);
    let boolean = types.bool();

    assert_eq!(binary_result_type(&types, BinaryOp::ShiftLeft, int), Some(int));
    assert_eq!(binary_result_type(&types, BinaryOp::GreaterEquals, int), Some(boolean));
    assert_eq!(binary_result_type(&types, BinaryOp::LogicalOr, int), None);
    assert_eq!(binary_result_type(&types, BinaryOp::Mod, float), Some(float));
    assert_eq!(binary_result_type(&types, BinaryOp::BitXor, float), None);
    assert_eq!(binary_result_type(&types, BinaryOp::NotEquals, boolean), Some(boolean));
    assert_eq!(binary_result_type(&types, BinaryOp::Less, boolean), None);
    assert_eq!(binary_result_type(&types, BinaryOp::Add, types.void()), None);

    assert!(is_valid_cast(&types, boolean, int));
    assert!(is_valid_cast(&types, float, int));
    assert!(!is_valid_cast(&types, int, boolean));
    assert!(is_valid_cast(&types, boolean, boolean));
}

#[test]
fn test_unconstrained_literals_default() {
    let checked = check("fn f() { 1 + 2; 1.5; (7, 2.5f64); }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.node("BinaryExpression")), "i32");
    assert_eq!(checked.type_name(checked.int_literal("1")), "i32");
    assert_eq!(checked.type_name(checked.int_literal("7")), "i32");
    let floats = checked.nodes("FloatLiteralExpression");
    assert_eq!(checked.type_name(floats[0]), "f32");
    assert_eq!(checked.type_name(floats[1]), "f64");
}

#[test]
fn test_comparison_operands_default() {
    let checked = check("fn f() -> bool { return 1 < 2; }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.int_literal("1")), "i32");
    assert_eq!(checked.type_name(checked.int_literal("2")), "i32");
}

#[test]
fn test_literal_follows_other_operand() {
    let checked = check("fn f(x: u8) -> u8 { return x + 1; }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.int_literal("1")), "u8");
}

#[test]
fn test_nested_literals_are_rewritten() {
    let checked = check("const x: i64 = (1 + 2) * -3;");

    assert!(checked.diagnostics.is_empty());
    for text in ["1", "2", "3"] {
        assert_eq!(checked.type_name(checked.int_literal(text)), "i64");
    }
    assert_eq!(checked.type_name(checked.node("PrefixExpression")), "i64");
}

#[test]
fn test_literal_ranges() {
    let cases = [
        ("const x: u8 = 255;", true),
        ("const x: u8 = 256;", false),
        ("const x: i8 = -128;", true),
        ("const x: i8 = 128;", false),
        ("const x = 0xFFi8;", false),
        ("const x = 0xFFu8;", true),
        ("fn f(x: u8) { x + 300; }", false),
        ("const x = 4294967296;", false),
        ("const x: u64 = 18446744073709551615;", true),
    ];

    for (source, accepted) in cases {
        let checked = check(source);
        if accepted {
            assert!(checked.diagnostics.is_empty(), "source: {}", source);
        } else {
            assert_eq!(checked.errors(), vec!["LiteralOutOfRange"], "source: {}", source);
        }
    }
}

#[test]
fn test_local_inference() {
    let checked = check("fn f() -> i64 { const x = 5; var z = 2.5; const y: i64 = 7; const w = y; return y; }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.variable_type("x"), "i32");
    assert_eq!(checked.variable_type("z"), "f32");
    assert_eq!(checked.variable_type("w"), "i64");
}

#[test]
fn test_cannot_infer_type() {
    let checked = check("fn f() { var x; }");
    let error = checked.diagnostics.first_error().unwrap();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::CannotInferType {
            variable: "x".to_string()
        }
    );
    assert_eq!(error.get_span(), Span::new(0, 13, 14));

    let checked = check("fn g() { } fn f() { const x = g(); x + 1; }");
    assert_eq!(checked.errors(), vec!["CannotInferType"]);
}

#[test]
fn test_assign_to_constant() {
    let checked = check("fn f() { const x = 1; x = 2; }");
    let error = checked.diagnostics.first_error().unwrap();

    assert_eq!(checked.errors(), vec!["AssignToConstant"]);
    assert_eq!(error.get_span(), Span::new(0, 22, 23));
    assert_eq!(error.get_extra_spans()[0].0, Span::new(0, 15, 16));
    assert_eq!(error.get_fixits()[0].span, Span::new(0, 9, 14));
    assert_eq!(error.get_fixits()[0].replacement, "var");
}

#[test]
fn test_assign_to_parameter_and_function() {
    let checked = check("fn f(n: i32) { n = 1; f = 2; n++; }");

    assert_eq!(
        checked.errors(),
        vec!["AssignToConstant", "AssignToConstant", "AssignToConstant"]
    );
    let fixits = checked.diagnostics.first_error().unwrap().get_fixits();
    assert_eq!(fixits[0].span, Span::point(0, 5));
    assert_eq!(fixits[0].replacement, "var ");

    let checked = check("fn f(var n: i32) { n = 1; n += 2; --n; }");
    assert!(checked.diagnostics.is_empty());
}

#[test]
fn test_assignment_types() {
    let checked = check("fn f() { var x: i32 = 0; x = true; }");
    assert_eq!(checked.errors(), vec!["AssignmentTypeMismatch"]);

    let checked = check("fn f() { var b = true; b += true; }");
    assert_eq!(checked.errors(), vec!["UnresolvableOperator"]);

    let checked = check("fn f() { var x: u16 = 1; x <<= 2; x = x * 3; }");
    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.int_literal("2")), "u16");
    assert_eq!(checked.type_name(checked.nodes("AssignmentExpression")[1]), "u16");
}

#[test]
fn test_call_checks() {
    let checked = check(
        "fn g(a: i32, b: f64) -> i32 { return a; } fn f() { g(1); g(1, 2.0, 3); g(true, 1.0); g(1, 2.0); }",
    );

    assert_eq!(
        checked.errors(),
        vec!["MissingArguments", "UnexpectedArguments", "ArgumentTypeMatchError"]
    );

    let calls = checked.nodes("FunctionCallExpression");
    assert_eq!(checked.type_name(calls[3]), "i32");
    let floats = checked.nodes("FloatLiteralExpression");
    assert_eq!(checked.type_name(floats[floats.len() - 1]), "f64");
}

#[test]
fn test_call_of_variable() {
    let checked = check("var v: i32 = 1; fn f() { v(); }");

    assert_eq!(
        checked.diagnostics.first_error().unwrap().get_kind(),
        &ErrorImpl::NotCallable {
            name: "v".to_string()
        }
    );
}

#[test]
fn test_forward_call_is_typed() {
    let checked = check("fn f() -> i32 { return g(2); } fn g(x: i32) -> i32 { return x; }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.node("FunctionCallExpression")), "i32");
    assert_eq!(checked.variable_type("g"), "fn(i32) -> i32");
}

#[test]
fn test_return_checks() {
    let cases = [
        ("fn f() -> i32 { return; }", "EmptyReturn"),
        ("fn f() { return 1; }", "ValueReturnInVoid"),
        ("fn f() -> bool { return 1; }", "ReturnTypeMismatch"),
    ];

    for (source, expected) in cases {
        assert_eq!(check(source).errors(), vec![expected], "source: {}", source);
    }

    assert!(check("fn f() { return; } fn g() -> f64 { return 1.0; }")
        .diagnostics
        .is_empty());
}

#[test]
fn test_negative_literals_follow_their_sign() {
    let cases = [
        ("const x: u8 = -1;", false),
        ("const x: u8 = -0;", true),
        ("const x = -5u32;", false),
        ("const x: i8 = -(-128);", false),
        ("const x: i8 = -(-127);", true),
        ("const x: i8 = -(+128);", true),
        ("const x: i16 = -(-(-32768));", true),
        ("fn f() { const x: u64 = -0x10; }", false),
    ];

    for (source, accepted) in cases {
        let checked = check(source);
        if accepted {
            assert!(checked.diagnostics.is_empty(), "source: {}", source);
        } else {
            assert_eq!(checked.errors(), vec!["LiteralOutOfRange"], "source: {}", source);
        }
    }
}

#[test]
fn test_negated_literal_is_reported_with_sign() {
    let checked = check("const x: u8 = -1;");

    assert_eq!(
        checked.diagnostics.first_error().unwrap().get_kind(),
        &ErrorImpl::LiteralOutOfRange {
            literal: "-1".to_string(),
            type_: "u8".to_string()
        }
    );
}

#[test]
fn test_literal_condition_reports_defaulted_type() {
    let checked = check("fn f() { if 1 { } }");

    assert_eq!(
        checked.diagnostics.first_error().unwrap().get_kind(),
        &ErrorImpl::NonBoolCondition {
            construct: "if".to_string(),
            received: "i32".to_string()
        }
    );
}

#[test]
fn test_conditions_must_be_bool() {
    let checked = check("fn f(x: i32) { if x { } while 1 { } for (; x; ) { } if x > 0 { } }");

    assert_eq!(
        checked.errors(),
        vec!["NonBoolCondition", "NonBoolCondition", "NonBoolCondition"]
    );
    assert_eq!(
        checked.diagnostics.first_error().unwrap().get_kind(),
        &ErrorImpl::NonBoolCondition {
            construct: "if".to_string(),
            received: "i32".to_string()
        }
    );
}

#[test]
fn test_unary_operators() {
    let checked = check("fn f(b: bool, x: f32) { !x; ~x; -b; !b; -x; ~1; +2.0; }");
    assert_eq!(
        checked.errors(),
        vec!["UnaryOperandMismatch", "UnaryOperandMismatch", "UnaryOperandMismatch"]
    );

    let checked = check("fn f() { ++1; }");
    assert_eq!(checked.errors(), vec!["NotAssignable"]);

    let checked = check("fn f() { var x = 1; x++; --x; var y = false; y++; }");
    assert_eq!(checked.errors(), vec!["UnaryOperandMismatch"]);
    assert_eq!(checked.type_name(checked.node("PostfixExpression")), "i32");
}

#[test]
fn test_casts() {
    let checked = check("fn f(b: bool, x: f64) { b as i32; x as u8; 1 as f32; x as bool; }");

    assert_eq!(checked.errors(), vec!["InvalidCast"]);
    let casts = checked.nodes("CastExpression");
    assert_eq!(checked.type_name(casts[0]), "i32");
    assert_eq!(checked.type_name(casts[1]), "u8");
    assert_eq!(checked.type_name(checked.int_literal("1")), "i32");
    assert_eq!(checked.type_name(casts[3]), "<error>");
}

#[test]
fn test_unknown_types_do_not_cascade() {
    let checked = check("var x: Foo = 1; fn f(a: Bar) -> i32 { return a; } fn g() -> i32 { return 1 as Baz; }");

    assert_eq!(
        checked.errors(),
        vec!["UnknownType", "UnknownType", "UnknownType"]
    );
}

#[test]
fn test_binding_errors_do_not_cascade() {
    let checked = check("fn f() -> i32 { return y + 1; } fn g() { z(1, 2); }");

    assert_eq!(checked.errors(), vec!["SymbolNotDeclared", "SymbolNotDeclared"]);
}

#[test]
fn test_comma_takes_last_type() {
    let checked = check("fn f() -> i64 { var a: i64 = 0; return (1, a, 2); }");

    assert!(checked.diagnostics.is_empty());
    assert_eq!(checked.type_name(checked.node("CommaExpression")), "i64");
    assert_eq!(checked.type_name(checked.int_literal("1")), "i32");
    assert_eq!(checked.type_name(checked.int_literal("2")), "i64");
}

#[test]
fn test_accepted_program_is_fully_typed() {
    let checked = check(
        "var total: u32 = 0;
         fn add(var a: u32, b: u32) -> u32 { a += b; return a; }
         fn main() -> i32 {
             for (var i = 0; i < 10; i++) {
                 total = add(total, i as u32);
             }
             if total > 40 && !false { return 1; } else { return -1; }
         }",
    );
    assert!(checked.diagnostics.is_empty());

    for (id, node) in checked.ast.iter() {
        if !node.kind.is_expression() {
            continue;
        }
        let ty = checked.table.expr_type(id).expect("untyped expression");
        assert!(checked.types.literal_kind(ty).is_none(), "{:?}", node.kind);
        assert!(!checked.types.is_error(ty), "{:?}", node.kind);
    }
    assert_eq!(checked.scopes.scope_count(), 7);
    assert!(checked.bindings.use_count() > 0);
}

#[test]
fn test_stringify_with_checked_types() {
    let checked = check("const x: u8 = 7;");

    assert_eq!(
        AstStringifier::with_type_table(&checked.types, &checked.table).stringify(&checked.ast),
        "(CompilationUnit '(VariableDeclaration vis='private' scope='global' const='const' type='u8' id='x' expr='(IntLiteralExpression base='dec' text='7' type='u8')')')"
    );
}
