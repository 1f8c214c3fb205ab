//! Integration tests for the Stonylang pipeline
//!
//! Drives parse, bind, lower and evaluate through the public
//! `Compilation` API, the way the CLI and the REPL do.

use std::io;
use std::rc::Rc;
use stony::diagnostics::{DiagnosticBag, DiagnosticKind};
use stony::interp::{ErrorKind, RuntimeError, Value, VariableStore};
use stony::lowering::lower;
use stony::printer::tree_to_string;
use stony::{Compilation, SyntaxTree};

/// Helper to evaluate a program with no stdin and discarded stdout
fn eval_program(source: &str) -> Result<(DiagnosticBag, Option<Value>), RuntimeError> {
    let compilation = Compilation::new(SyntaxTree::parse(source));
    let mut store = VariableStore::new();
    let result = compilation.evaluate_with(&mut store, Box::new(io::empty()), Box::new(io::sink()))?;
    Ok((result.diagnostics, result.value))
}

/// Helper to evaluate a program that must bind cleanly
fn eval(source: &str) -> Value {
    let (diagnostics, value) = eval_program(source).expect("evaluation should succeed");
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    value.expect("clean program should produce a value")
}

/// Helper to collect the diagnostics of a program
fn diagnostics(source: &str) -> DiagnosticBag {
    Compilation::new(SyntaxTree::parse(source)).diagnostics()
}

fn string(s: &str) -> Value {
    Value::Str(s.to_string())
}

// ============================================
// Scopes
// ============================================

#[test]
fn test_inner_block_shadows_outer_variable() {
    let source = r#"
        var x = 1;
        var mut seen = "";
        {
            var x = "inner";
            seen = x
        }
        seen + x
    "#;
    assert_eq!(eval(source), string("inner1"));
}

#[test]
fn test_redeclaration_in_same_scope() {
    let diags = diagnostics("var x = 1; var x = 2;");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.count_of(DiagnosticKind::DeclarationException), 1);
}

// ============================================
// Types and conversions
// ============================================

#[test]
fn test_numeric_promotion() {
    assert_eq!(eval("1 + 2.5"), Value::Float(3.5));
    assert_eq!(eval("2 + 3"), Value::Int(5));
}

#[test]
fn test_conversion_round_trip() {
    assert_eq!(eval("int(stringify(42))"), Value::Int(42));
    assert_eq!(eval("int(stringify(-7))"), Value::Int(-7));
    assert_eq!(eval("bool(stringify(true))"), Value::Bool(true));
    assert_eq!(eval("bool(stringify(false))"), Value::Bool(false));
    assert_eq!(eval("string(stringify(\"stone\"))"), string("stone"));

    let Value::Float(x) = eval("float(stringify(0.1 + 0.2))") else {
        panic!("Expected Float");
    };
    assert_eq!(x, 0.1 + 0.2);
}

#[test]
fn test_bad_conversion_is_runtime_fault() {
    let err = eval_program("int(\"twelve\")").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConversionFailed);
}

// ============================================
// Strings
// ============================================

#[test]
fn test_string_operators() {
    assert_eq!(eval("\"ab\" * 3"), string("ababab"));
    assert_eq!(eval("\"hello\" - 2"), string("hel"));
}

#[test]
fn test_string_minus_negative_appends() {
    assert_eq!(eval("\"hi\" - (-1)"), string("hi1"));
    assert_eq!(eval("\"hi\" - (-42)"), string("hi42"));
}

// ============================================
// Control flow
// ============================================

#[test]
fn test_for_loop_sum() {
    assert_eq!(eval("var mut s = 0; for i = 0 to 5 { s = s + i } s"), Value::Int(10));
}

#[test]
fn test_nested_loops_and_branches() {
    let source = r#"
        var mut evens = 0;
        var mut odds = 0;
        for i = 0 to 4 {
            var mut j = 0;
            while j < i {
                if (i + j) % 2 == 0 { evens += 1 } else { odds += 1 }
                ++j
            }
        }
        stringify(evens) + "/" + stringify(odds)
    "#;
    // pairs (i, j) with j < i < 4: six in total, four of them odd sums
    assert_eq!(eval(source), string("2/4"));
}

#[test]
fn test_do_while_executes_body_first() {
    assert_eq!(eval("var mut n = 0; do { n += 1 } while false; n"), Value::Int(1));
}

#[test]
fn test_factorial_quirk() {
    assert_eq!(eval("!5"), Value::Int(120));
    assert_eq!(eval("!1"), Value::Int(1));
    assert_eq!(eval("!false"), Value::Bool(true));
}

#[test]
fn test_lowering_is_deterministic() {
    let source = "var mut t = 0; for i = 0 to 3 { if i > 1 { t = t + i } else { t = t - 1 } }";
    let syntax = SyntaxTree::parse(source);
    let compilation = Compilation::new(syntax);
    let scope = compilation.global_scope();
    let first = lower(&scope.statement, &scope.variable_ids);
    let second = lower(&scope.statement, &scope.variable_ids);
    assert_eq!(tree_to_string(&first), tree_to_string(&second));
}

// ============================================
// Diagnostics
// ============================================

#[test]
fn test_mutation_rejection() {
    let diags = diagnostics("var x = 1; x = 2");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.count_of(DiagnosticKind::AssignmentException), 1);
}

#[test]
fn test_error_suppression() {
    let diags = diagnostics("undefined_name + 1");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.count_of(DiagnosticKind::KeyNotFoundException), 1);
}

#[test]
fn test_diagnostics_block_evaluation() {
    let (diags, value) = eval_program("println(1); var s: int = \"text\"").unwrap();
    assert_eq!(diags.count_of(DiagnosticKind::TypeException), 1);
    assert!(value.is_none());
}

#[test]
fn test_diagnostic_positions() {
    let diags = diagnostics("var a = 1;\nb + a");
    let diagnostic = diags.iter().next().unwrap();
    assert_eq!((diagnostic.line, diagnostic.column), (2, 1));
    assert_eq!(diagnostic.span.len(), 1);
}

#[test]
fn test_unknown_function_suggests_similar_name() {
    let diags = diagnostics("pritn(1)");
    let diagnostic = diags.iter().next().unwrap();
    assert_eq!(diagnostic.help.as_deref(), Some("did you mean `print`?"));
}

// ============================================
// REPL-style chaining
// ============================================

#[test]
fn test_continue_with_chain() {
    let mut store = VariableStore::new();
    let mut run = |compilation: &Compilation| {
        compilation
            .evaluate_with(&mut store, Box::new(io::empty()), Box::new(io::sink()))
            .unwrap()
            .value
    };

    let first = Compilation::new(SyntaxTree::parse("var mut count = 1"));
    assert_eq!(run(&first), Some(Value::Int(1)));

    let second = first.continue_with(SyntaxTree::parse("count = count * 10"));
    assert_eq!(run(&second), Some(Value::Int(10)));

    // a later submission may redeclare an earlier name
    let third = second.continue_with(SyntaxTree::parse("var count = \"ten\""));
    assert_eq!(run(&third), Some(string("ten")));

    let fourth = third.continue_with(SyntaxTree::parse("count + \"!\""));
    assert_eq!(run(&fourth), Some(string("ten!")));
    assert!(Rc::ptr_eq(fourth.previous().unwrap(), &third));
}

// ============================================
// Built-ins and IO
// ============================================

#[test]
fn test_print_output_and_input() {
    let compilation = Compilation::new(SyntaxTree::parse(
        "var name = input(); print(\"hello, \"); println(name); println(1 + 1)",
    ));
    let mut store = VariableStore::new();
    let mut out = Vec::new();
    let result = compilation
        .evaluate_with(&mut store, Box::new("stone\n".as_bytes()), Box::new(&mut out))
        .unwrap();
    assert_eq!(result.value, Some(Value::Void));
    assert_eq!(String::from_utf8(out).unwrap(), "hello, stone\n2\n");
}

#[test]
fn test_random_overloads() {
    let Value::Int(n) = eval("random(10)") else {
        panic!("Expected Int");
    };
    assert!((0..10).contains(&n));
    let Value::Float(x) = eval("random(1.5)") else {
        panic!("Expected Float");
    };
    assert!((0.0..1.5).contains(&x));
}

// ============================================
// Snapshots
// ============================================

#[test]
fn test_lowered_while_snapshot() {
    let compilation = Compilation::new(SyntaxTree::parse("var mut i = 0; while i < 2 { i = i + 1 }"));
    let mut out = Vec::new();
    compilation.emit_tree(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    insta::assert_snapshot!("lowered_while_program", text);
}
