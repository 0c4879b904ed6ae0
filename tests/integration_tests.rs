//! Integration tests for the whole pipeline.
//!
//! These run source text through parsing, type checking and evaluation the
//! way the command-line shell does.

use std::thread;

use sigil::{
    builtins::Builtins, check, parser::parser::parse, run,
    type_checker::type_checker::type_check, type_checker::types::Type, Failure, Outcome,
    STACK_SIZE,
};

fn run_source(source: &str) -> (Result<Outcome, Failure>, String) {
    let mut out = Vec::new();
    let result = run(source, Some("test.sgl".to_string()), &mut out);

    (result, String::from_utf8(out).unwrap())
}

fn eval(source: &str) -> String {
    match run_source(source).0 {
        Ok(outcome) => outcome.value,
        Err(failure) => panic!("{:?} failed: {:?}", source, failure),
    }
}

fn type_errors(source: &str) -> Vec<String> {
    match run_source(source).0 {
        Err(Failure::Type(errors)) => errors.iter().map(|error| error.to_string()).collect(),
        other => panic!("expected type errors for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(eval("1 + 2 * 3"), "7");
    assert_eq!(eval("(5 + 10 * 2 + 15 / 3) * 2 + -10"), "50");
}

#[test]
fn test_equality_with_tolerance() {
    assert_eq!(eval("1 == 1"), "true");
    assert_eq!(eval("1 / 10 + 2 / 10 == 3 / 10"), "true");
    assert_eq!(eval("1 / 3 * 3 != 1"), "false");
}

#[test]
fn test_nested_return_escapes_every_block() {
    assert_eq!(
        eval("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
        "10"
    );
}

#[test]
fn test_top_level_return_ends_program() {
    let (result, output) = run_source("println(\"a\"); return \"early\"; println(\"b\"); 5");

    assert_eq!(result.map(|outcome| outcome.value), Ok("early".to_string()));
    assert_eq!(output, "a\n");
}

/// Runs on a thread with the stack size the command line uses.
fn run_deep(source: String) -> Result<String, String> {
    thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || match run_source(&source).0 {
            Ok(outcome) => Ok(outcome.value),
            Err(failure) => Err(format!("{:?}", failure)),
        })
        .unwrap()
        .join()
        .unwrap()
}

fn count_down(n: usize) -> String {
    format!(
        "let f = fun(n: Number): Number {{ if (n == 0) {{ 0 }} else {{ f(n - 1) + 1 }} }}; f({})",
        n
    )
}

#[test]
fn test_deep_recursion() {
    assert_eq!(run_deep(count_down(4_000)), Ok("4000".to_string()));
}

#[test]
fn test_runaway_recursion_is_a_runtime_error() {
    assert_eq!(
        run_deep(count_down(100_000)),
        Err("Runtime(CallDepthExceeded { limit: 5000 })".to_string())
    );
}

#[test]
fn test_check_stops_before_running() {
    let checked = check("let x = 1; x + 1", None).unwrap();
    assert_eq!(checked.program_type, Type::Number);
    assert_eq!(checked.program.statements.len(), 2);

    assert!(matches!(check("1 +", None), Err(Failure::Syntax(_))));
    assert!(matches!(check("-\"a\"", None), Err(Failure::Type(_))));
}

#[test]
fn test_closures_and_recursion() {
    assert_eq!(
        eval("let add = fun(x: Number, y: Number): Number { x + y }; add(2,3)"),
        "5"
    );

    let source = "
        let factorial = fun(n: Number): Number {
            if (n <= 1) { return 1; }
            n * factorial(n - 1)
        };
        factorial(10)
    ";
    assert_eq!(eval(source), "3628800");
}

#[test]
fn test_unknown_type_reports_once() {
    let errors = type_errors("let x: Number = -(missing + 1) * 2;");

    assert_eq!(errors, vec!["1:19: identifier not found: missing".to_string()]);
}

#[test]
fn test_type_errors_stop_evaluation() {
    let (result, output) = run_source("println(\"side effect\"); let x: Number = \"no\";");

    assert!(matches!(result, Err(Failure::Type(_))));
    assert_eq!(output, "");
}

#[test]
fn test_syntax_errors_stop_checking() {
    let (result, output) = run_source("println(\"side effect\"); let = 5;");

    match result {
        Err(Failure::Syntax(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected a syntax failure, got {:?}", other),
    }
    assert_eq!(output, "");
}

#[test]
fn test_checking_twice_gives_same_errors() {
    let source = "let a: String = 1; let b = a + true; if (5) { 1 } else { 2 }";
    let (program, syntax_errors) = parse(source.to_string(), None);
    assert!(syntax_errors.is_empty());

    let builtins = Builtins::new();
    let (_, first) = type_check(&program, &builtins);
    let (_, second) = type_check(&program, &builtins);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_greeting() {
    let (result, _) = run_source("let greeting: String = \"Hello\" + \" World!\"; greeting");

    assert_eq!(
        result,
        Ok(Outcome {
            value_type: Type::String,
            value: "Hello World!".to_string(),
        })
    );
}

#[test]
fn test_operand_mismatch_is_a_type_error() {
    assert_eq!(type_errors("5 + true"), vec!["1:3: type mismatch: Number + Boolean".to_string()]);
}

#[test]
fn test_printing_program() {
    let source = "
        let greet = fun(name: String): Void {
            println(\"Hello,\", name + \"!\");
        };
        greet(\"Ada\");
        print(\"len=\");
        println(string(len(\"Ada\")));
    ";
    let (result, output) = run_source(source);

    assert_eq!(
        result,
        Ok(Outcome {
            value_type: Type::Void,
            value: "null".to_string(),
        })
    );
    assert_eq!(output, "Hello, Ada!\nlen=3\n");
}

#[test]
fn test_counter_closure() {
    let source = "
        let makeCounter = fun(): () => Number {
            let count = 0;
            fun(): Number {
                count = count + 1;
                count
            }
        };
        let first = makeCounter();
        let second = makeCounter();
        first();
        first();
        second();
        first()
    ";

    assert_eq!(eval(source), "3");
}

#[test]
fn test_higher_order_functions() {
    let source = "
        let twice = fun(f: (Number) => Number, x: Number): Number { f(f(x)) };
        let square = fun(x: Number): Number { x * x };
        twice(square, 3)
    ";

    assert_eq!(eval(source), "81");
}

#[test]
fn test_float_edge_values_print() {
    let (result, output) = run_source("println(\"before\"); println(string(1 / 0)); len(string(0 / 0))");

    assert_eq!(result.map(|outcome| outcome.value), Ok("3".to_string()));
    assert_eq!(output, "before\nInf\n");
}
