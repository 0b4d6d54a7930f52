use codespan_reporting::term::termcolor::Buffer;

use super::{check_source, CompilerOptions, ErrorPolicy};

fn names(source: &str, options: &CompilerOptions) -> Vec<String> {
    check_source(source, "test.sema", options)
        .diagnostics
        .iter()
        .map(|error| error.get_error_name().to_string())
        .collect()
}

#[test]
fn test_default_options() {
    let options = CompilerOptions::default();

    assert_eq!(options.error_policy, ErrorPolicy::Accumulate);
    assert!(!options.warn_unreachable);
}

#[test]
fn test_clean_program_is_checked() {
    let source = "fn add(a: i32, b: i32) -> i32 { return a + b; }
                  fn main() -> i32 { return add(1, 2); }";
    let compilation = check_source(source, "test.sema", &CompilerOptions::default());

    assert!(!compilation.has_errors());
    assert!(compilation.checked().is_some());

    let program = compilation.into_checked().unwrap();
    assert_eq!(program.flow.len(), 2);
    assert!(program.type_table.expr_count() > 0);
    assert_eq!(program.bindings.use_count(), 3);
}

#[test]
fn test_syntax_error_stops_pipeline() {
    let compilation = check_source("fn f( { }", "test.sema", &CompilerOptions::default());

    assert_eq!(compilation.diagnostics.error_count(), 1);
    assert!(compilation.analysis().is_none());
    assert!(compilation.into_checked().is_err());
}

#[test]
fn test_unrecognised_character() {
    let errors = names("const x = 1 $ 2;", &CompilerOptions::default());

    assert_eq!(errors, vec!["UnrecognisedToken"]);
}

#[test]
fn test_accumulate_reports_every_pass() {
    let source = "fn f() -> i32 { y; } fn g() { const b: bool = 1; }";
    let errors = names(source, &CompilerOptions::default());

    assert_eq!(
        errors,
        vec!["SymbolNotDeclared", "VariableTypeMismatch", "MissingReturn"]
    );
}

#[test]
fn test_fail_fast_keeps_first_binding_error() {
    let source = "fn f() -> i32 { y; z; } fn g() { const b: bool = 1; }";
    let errors = names(source, &CompilerOptions::fail_fast());

    assert_eq!(errors, vec!["SymbolNotDeclared"]);
}

#[test]
fn test_fail_fast_keeps_first_type_error() {
    let source = "fn f() -> i32 { } fn g() { const b: bool = 1; const c: u8 = true; }";
    let compilation = check_source(source, "test.sema", &CompilerOptions::fail_fast());

    let errors: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|error| error.get_error_name())
        .collect();
    assert_eq!(errors, vec!["VariableTypeMismatch"]);
    assert!(compilation.analysis().is_some());
    assert!(compilation.checked().is_none());
}

#[test]
fn test_warnings_do_not_block() {
    let options = CompilerOptions {
        warn_unreachable: true,
        ..Default::default()
    };
    let compilation = check_source("fn f() -> i32 { return 1; 2; }", "test.sema", &options);

    assert_eq!(compilation.diagnostics.warning_count(), 1);
    assert!(compilation.checked().is_some());
}

#[test]
fn test_emit_renders_diagnostics() {
    let compilation = check_source(
        "fn f() {\n    const x = 1;\n    x = 2;\n}",
        "consts.sema",
        &CompilerOptions::default(),
    );
    let mut buffer = Buffer::no_color();
    compilation.emit_to(&mut buffer).unwrap();
    let rendered = String::from_utf8(buffer.into_inner()).unwrap();

    assert!(rendered.contains("cannot assign to constant `x`"));
    assert!(rendered.contains("AssignToConstant"));
    assert!(rendered.contains("consts.sema:3:5"));
    assert!(rendered.contains("declared here"));
}

#[test]
fn test_unknown_type_in_return_signature_reported_once() {
    let errors = names("fn f() -> fn(Foo) -> i32 { }", &CompilerOptions::default());

    assert_eq!(errors, vec!["UnknownType"]);
}
