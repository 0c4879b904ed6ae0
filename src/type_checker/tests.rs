//! Unit tests for the type checker.

use crate::{builtins::Builtins, parser::parser::parse};

use super::{type_checker::type_check, types::Type};

fn check(source: &str) -> (Type, Vec<String>) {
    let (program, syntax_errors) = parse(source.to_string(), Some("test.sgl".to_string()));
    assert!(syntax_errors.is_empty(), "syntax errors: {:?}", syntax_errors);

    let builtins = Builtins::new();
    let (program_type, errors) = type_check(&program, &builtins);

    (
        program_type,
        errors.iter().map(|error| error.get_message()).collect(),
    )
}

fn check_ok(source: &str) -> String {
    let (program_type, errors) = check(source);
    assert!(errors.is_empty(), "type errors for {:?}: {:?}", source, errors);

    program_type.to_string()
}

fn check_errors(source: &str) -> Vec<String> {
    check(source).1
}

#[test]
fn test_basic_types() {
    let cases = [
        ("1 + 2", "Number"),
        ("\"a\" + \"b\"", "String"),
        ("let x: Number = 5;", "Void"),
        ("1 + 2;", "Void"),
        ("", "Void"),
        ("if (true) { 10 } else { 20 }", "Number"),
        ("if (true) { 10 }", "Void"),
        ("fun(x: Number): Number { x + 1 }", "(Number) -> Number"),
        ("fun(x: Number, y: Number): Number { x + y }", "(Number, Number) -> Number"),
        ("fun(): Number { 42 }", "() -> Number"),
        ("-5", "Number"),
        ("!true", "Boolean"),
        ("1 == 2", "Boolean"),
        ("5 <= 10", "Boolean"),
        ("let b: Bool = true; b", "Boolean"),
        ("let x = 1; x = 2", "Void"),
        ("let x: Number = 5; let x: Number = x + 1;", "Void"),
    ];

    for (source, expected) in cases {
        assert_eq!(check_ok(source), expected, "source: {}", source);
    }
}

#[test]
fn test_function_type_annotation() {
    assert_eq!(
        check_ok("let f: (Number) => Boolean = fun(x: Number): Boolean { x > 0 }; f"),
        "(Number) -> Boolean"
    );
}

#[test]
fn test_operator_errors() {
    let cases = [
        ("5 + true", "type mismatch: Number + Boolean"),
        ("1 == \"hi\"", "type mismatch: Number == String"),
        ("5 < \"x\"", "type mismatch: Number < String"),
        ("true + false", "unknown operator: Boolean + Boolean"),
        ("\"a\" - \"b\"", "unknown operator: String - String"),
        ("true < false", "unknown operator: Boolean < Boolean"),
        ("-true", "unknown operator: -Boolean"),
        ("!42", "unknown operator: !Number"),
    ];

    for (source, expected) in cases {
        assert_eq!(check_errors(source), vec![expected.to_string()], "source: {}", source);
    }
}

#[test]
fn test_error_position_is_operator() {
    let (program, _) = parse("5 + true".to_string(), None);
    let builtins = Builtins::new();
    let (_, errors) = type_check(&program, &builtins);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_position().line, 1);
    assert_eq!(errors[0].get_position().column, 3);
}

#[test]
fn test_if_errors() {
    assert_eq!(
        check_errors("if (42) { 10 } else { 20 }"),
        vec!["if condition must be Boolean, got Number".to_string()]
    );
    assert_eq!(
        check_errors("if (true) { 10 } else { \"s\" }"),
        vec!["if branches have different types: Number and String".to_string()]
    );
    assert!(!check_errors("if (true) { 1 } else { if (false) { 2 } else { \"x\" } }").is_empty());
}

#[test]
fn test_declaration_errors() {
    assert_eq!(
        check_errors("let x: String = 5;"),
        vec!["type mismatch: declared String but got Number".to_string()]
    );
    assert_eq!(
        check_errors("let x: Strin = \"a\";"),
        vec!["unknown type: Strin".to_string()]
    );
}

#[test]
fn test_assignment_errors() {
    assert_eq!(
        check_errors("let x = 5; x = \"a\";"),
        vec!["assignment type mismatch: expected Number, got String".to_string()]
    );
    assert_eq!(
        check_errors("y = 5;"),
        vec!["identifier not found: y".to_string()]
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(check_ok("return 5;"), "Number");
    assert_eq!(check_ok("return;"), "Void");
    assert_eq!(
        check_ok("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
        "Void"
    );
    // The program level places no constraint on what a return carries
    assert_eq!(check_ok("return \"done\"; 5"), "Number");
    assert_eq!(
        check_ok("fun(n: Number): Number { if (n < 0) { return 0; } n }"),
        "(Number) -> Number"
    );
    assert_eq!(check_ok("fun(): Void { return; }"), "() -> Void");

    let errors = check_errors("fun(): Number { return \"a\"; }");
    assert!(errors.contains(&"return type mismatch: expected Number, got String".to_string()));
}

#[test]
fn test_function_body_mismatch() {
    assert_eq!(
        check_errors("fun(): Number { \"a\" }"),
        vec!["function body type mismatch: expected Number, got String".to_string()]
    );
    assert_eq!(
        check_errors("fun(x: Number): Number { let y: String = x; y }"),
        vec![
            "type mismatch: declared String but got Number".to_string(),
            "function body type mismatch: expected Number, got String".to_string(),
        ]
    );
}

#[test]
fn test_call_errors() {
    assert_eq!(
        check_errors("let x = 5; x(1)"),
        vec!["not a function: Number".to_string()]
    );
    assert_eq!(
        check_errors("let f = fun(x: Number): Number { x }; f(1, 2)"),
        vec!["wrong number of arguments: expected 1, got 2".to_string()]
    );
    assert_eq!(
        check_errors("fun(x: Number): Number { x + 1 }(\"hello\")"),
        vec!["argument 1 type mismatch: expected Number, got String".to_string()]
    );
    assert_eq!(check_ok("fun(x: Number): Number { x + 1 }(5)"), "Number");
}

#[test]
fn test_builtin_calls() {
    assert_eq!(check_ok("len(\"abc\")"), "Number");
    assert_eq!(check_ok("println(\"a\", \"b\")"), "Void");
    assert_eq!(check_ok("print()"), "Void");
    assert_eq!(check_ok("string(5)"), "String");
    assert_eq!(check_ok("string(fun(): Void { })"), "String");

    assert_eq!(
        check_errors("println(\"a\", 1)"),
        vec!["argument 2 type mismatch: expected String, got Number".to_string()]
    );
    assert_eq!(
        check_errors("len(1)"),
        vec!["argument 1 type mismatch: expected String, got Number".to_string()]
    );
    assert_eq!(
        check_errors("len(\"a\", \"b\")"),
        vec!["wrong number of arguments: expected 1, got 2".to_string()]
    );
}

#[test]
fn test_builtin_as_value() {
    assert_eq!(check_ok("let p = println; p"), "(String) -> Void");
    assert_eq!(check_ok("len"), "(String) -> Number");
}

#[test]
fn test_bindings_shadow_builtins() {
    assert_eq!(
        check_ok("let len = fun(x: Number): Number { x }; len(5)"),
        "Number"
    );
}

#[test]
fn test_recursive_function() {
    assert_eq!(
        check_ok(
            "let fact = fun(n: Number): Number { if (n < 2) { 1 } else { n * fact(n - 1) } }; fact(5)"
        ),
        "Number"
    );
}

#[test]
fn test_higher_order_function() {
    assert_eq!(
        check_ok(
            "let adder = fun(x: Number): (Number) => Number { fun(y: Number): Number { x + y } }; adder(1)(2)"
        ),
        "Number"
    );
}

#[test]
fn test_block_scopes() {
    assert_eq!(
        check_errors("{ let inner = 1; } inner"),
        vec!["identifier not found: inner".to_string()]
    );
    assert_eq!(
        check_errors("if (true) { let a = 1; a } else { 2 }; a"),
        vec!["identifier not found: a".to_string()]
    );
    assert_eq!(
        check_errors("let f = fun(x: Number): Number { x }; x"),
        vec!["identifier not found: x".to_string()]
    );
}

#[test]
fn test_unknown_suppresses_cascade() {
    assert_eq!(
        check_errors("let a: Number = -(missing + 1) * 2 == 3;"),
        vec!["identifier not found: missing".to_string()]
    );
    assert_eq!(
        check_errors("if (missing) { 1 } else { 2 }"),
        vec!["identifier not found: missing".to_string()]
    );
    assert_eq!(
        check_errors("len(missing)"),
        vec!["identifier not found: missing".to_string()]
    );
    assert_eq!(
        check_errors("missing(1, 2)"),
        vec!["identifier not found: missing".to_string()]
    );
}

#[test]
fn test_checking_twice_is_idempotent() {
    let (program, _) = parse("let x: String = 1; x + 2; y".to_string(), None);
    let builtins = Builtins::new();

    let (first_type, first_errors) = type_check(&program, &builtins);
    let (second_type, second_errors) = type_check(&program, &builtins);

    assert_eq!(first_type, second_type);
    assert_eq!(first_errors, second_errors);
    assert_eq!(first_errors.len(), 3);
}
