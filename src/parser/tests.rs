//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Let and return statements
//! - Operator precedence
//! - Function literals, calls and `if` expressions
//! - Type annotations
//! - Error reporting and recovery

use crate::ast::{
    ast::{Expr, Program, Stmt},
    types::TypeAnnotation,
};

use super::parser::parse;

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source.to_string(), Some("test.sgl".to_string()));

    assert!(errors.is_empty(), "unexpected syntax errors: {:?}", errors);
    program
}

fn error_messages(source: &str) -> Vec<String> {
    let (_, errors) = parse(source.to_string(), Some("test.sgl".to_string()));

    errors.iter().map(|error| error.get_message()).collect()
}

#[test]
fn test_parse_let_statement() {
    let program = parse_ok("let x: Number = 5;");

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0] {
        Stmt::Let(stmt) => {
            assert_eq!(stmt.name.name, "x");
            match &stmt.type_annotation {
                Some(TypeAnnotation::Simple(simple)) => assert_eq!(simple.name, "Number"),
                other => panic!("Expected simple annotation, got {:?}", other),
            }
            match &stmt.value {
                Expr::Number(number) => assert_eq!(number.value, 5.0),
                other => panic!("Expected number, got {:?}", other),
            }
        }
        other => panic!("Expected let statement, got {:?}", other),
    }
}

#[test]
fn test_parse_let_without_annotation_or_semicolon() {
    let program = parse_ok("let greeting = \"hi\"");

    match &program.statements[0] {
        Stmt::Let(stmt) => {
            assert!(stmt.type_annotation.is_none());
            assert!(matches!(&stmt.value, Expr::String(s) if s.value == "hi"));
        }
        other => panic!("Expected let statement, got {:?}", other),
    }
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("a == b != c", "((a == b) != c)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        ("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))", "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"),
        ("-add(1)", "(-add(1))"),
        ("x <= y >= z", "((x <= y) >= z)"),
    ];

    for (source, expected) in cases {
        assert_eq!(parse_ok(source).to_string(), expected, "source: {}", source);
    }
}

#[test]
fn test_parse_function_literal() {
    let program = parse_ok("fun(x: Number, y: Number): Number { x + y }");

    match &program.statements[0] {
        Stmt::Expression(stmt) => match &stmt.expression {
            Expr::Function(function) => {
                assert!(function.name.is_none());
                assert_eq!(function.parameters.len(), 2);
                assert_eq!(function.parameters[0].name.name, "x");
                assert_eq!(function.parameters[1].type_annotation.to_string(), "Number");
                assert_eq!(function.return_type.to_string(), "Number");
                assert_eq!(function.body.statements.len(), 1);
            }
            other => panic!("Expected function literal, got {:?}", other),
        },
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_let_names_function_literal() {
    let program = parse_ok("let add = fun(x: Number, y: Number): Number { x + y };");

    match &program.statements[0] {
        Stmt::Let(stmt) => match &stmt.value {
            Expr::Function(function) => assert_eq!(function.name.as_deref(), Some("add")),
            other => panic!("Expected function literal, got {:?}", other),
        },
        other => panic!("Expected let statement, got {:?}", other),
    }

    assert_eq!(
        program.to_string(),
        "let add = fun(x: Number, y: Number): Number { (x + y) };"
    );
}

#[test]
fn test_parse_function_type_annotation() {
    let program = parse_ok("let f: (Number, String) => Boolean = g;");

    match &program.statements[0] {
        Stmt::Let(stmt) => match &stmt.type_annotation {
            Some(TypeAnnotation::Function(function)) => {
                assert_eq!(function.parameters.len(), 2);
                assert_eq!(function.return_type.to_string(), "Boolean");
            }
            other => panic!("Expected function annotation, got {:?}", other),
        },
        other => panic!("Expected let statement, got {:?}", other),
    }

    assert_eq!(
        program.to_string(),
        "let f: (Number, String) => Boolean = g;"
    );
}

#[test]
fn test_parse_empty_function_type() {
    let program = parse_ok("let f: () => Void = fun(): Void { };");

    assert_eq!(program.to_string(), "let f: () => Void = fun(): Void { };");
}

#[test]
fn test_parse_if_else() {
    let program = parse_ok("if (x < y) { x } else { y }");

    match &program.statements[0] {
        Stmt::Expression(stmt) => match &stmt.expression {
            Expr::If(if_expr) => {
                assert_eq!(if_expr.condition.to_string(), "(x < y)");
                assert_eq!(if_expr.consequence.statements.len(), 1);
                assert!(if_expr.alternative.is_some());
            }
            other => panic!("Expected if expression, got {:?}", other),
        },
        other => panic!("Expected expression statement, got {:?}", other),
    }

    assert_eq!(program.to_string(), "if (x < y) { x } else { y }");
}

#[test]
fn test_parse_if_without_else() {
    let program = parse_ok("if (true) { 1; }");

    match &program.statements[0] {
        Stmt::Expression(stmt) => {
            assert!(matches!(&stmt.expression, Expr::If(if_expr) if if_expr.alternative.is_none()))
        }
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment() {
    let program = parse_ok("x = y = 5;");

    match &program.statements[0] {
        Stmt::Expression(stmt) => match &stmt.expression {
            Expr::Assignment(assignment) => {
                assert_eq!(assignment.name, "x");
                assert!(matches!(assignment.value.as_ref(), Expr::Assignment(inner) if inner.name == "y"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        },
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_return_statements() {
    let program = parse_ok("return 5; return; return x + 1");

    let values = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Return(stmt) => stmt.value.as_ref().map(|value| value.to_string()),
            other => panic!("Expected return statement, got {:?}", other),
        })
        .collect::<Vec<Option<String>>>();

    assert_eq!(
        values,
        vec![Some("5".to_string()), None, Some("(x + 1)".to_string())]
    );
}

#[test]
fn test_bare_return_before_closing_brace() {
    let program = parse_ok("fun(): Void { return }");

    assert_eq!(program.to_string(), "fun(): Void { return; }");
}

#[test]
fn test_semicolon_flag() {
    let program = parse_ok("1; 2");

    let flags = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Expression(stmt) => stmt.has_semicolon,
            other => panic!("Expected expression statement, got {:?}", other),
        })
        .collect::<Vec<bool>>();

    assert_eq!(flags, vec![true, false]);
}

#[test]
fn test_parse_standalone_block() {
    let program = parse_ok("{ let a = 1; a }");

    match &program.statements[0] {
        Stmt::Block(block) => assert_eq!(block.statements.len(), 2),
        other => panic!("Expected block statement, got {:?}", other),
    }
}

#[test]
fn test_infix_token_position() {
    let program = parse_ok("5 + true");

    match &program.statements[0] {
        Stmt::Expression(stmt) => {
            assert_eq!(stmt.expression.position().line, 1);
            assert_eq!(stmt.expression.position().column, 3);
        }
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_missing_identifier_error() {
    let (program, errors) = parse("let = 5;".to_string(), None);

    assert!(program.statements.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_message(),
        "expected next token to be Identifier, got Assignment instead"
    );
    assert_eq!(errors[0].get_position().column, 5);
}

#[test]
fn test_no_prefix_parse_function_error() {
    assert_eq!(
        error_messages("@;"),
        vec!["no prefix parse function for Illegal found".to_string()]
    );
}

#[test]
fn test_recovers_after_broken_statement() {
    let (program, errors) = parse("let x 5; let y = 2;".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_message(),
        "expected next token to be Assignment, got Number instead"
    );
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.to_string(), "let y = 2;");
}

#[test]
fn test_reports_every_broken_statement() {
    let messages = error_messages("let = 1; let = 2; 3 +;");

    assert_eq!(
        messages,
        vec![
            "expected next token to be Identifier, got Assignment instead".to_string(),
            "expected next token to be Identifier, got Assignment instead".to_string(),
            "no prefix parse function for Semicolon found".to_string(),
        ]
    );
}

#[test]
fn test_stray_closing_brace_does_not_hang() {
    let (program, errors) = parse("} 1".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_message(),
        "no prefix parse function for CloseCurly found"
    );
    assert_eq!(program.to_string(), "1");
}

#[test]
fn test_recovers_inside_block() {
    let (program, errors) = parse("let f = fun(): Number { let = 1; 5 };".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let f = fun(): Number { 5 };");
}

#[test]
fn test_if_requires_parentheses() {
    assert_eq!(
        error_messages("if x { 1 }")[0],
        "expected next token to be OpenParen, got Identifier instead"
    );
}

#[test]
fn test_function_requires_return_annotation() {
    assert_eq!(
        error_messages("fun(x: Number) { x }")[0],
        "expected next token to be Colon, got OpenCurly instead"
    );
}

#[test]
fn test_parameter_requires_annotation() {
    assert_eq!(
        error_messages("fun(x): Number { x }")[0],
        "expected next token to be Colon, got CloseParen instead"
    );
}

#[test]
fn test_unclosed_call_reports_error() {
    assert_eq!(
        error_messages("add(1, 2")[0],
        "expected next token to be CloseParen, got EOF instead"
    );
}
