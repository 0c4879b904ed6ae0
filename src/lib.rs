#![allow(clippy::module_inception)]

use std::{fmt::Display, io::Write, rc::Rc, time::{Duration, Instant}};

use crate::{
    ast::ast::Program,
    builtins::Builtins,
    errors::errors::{Error, ErrorTip, RuntimeError},
    interpreter::interpreter::execute,
    parser::parser::parse,
    type_checker::{type_checker::type_check, types::Type},
};

pub mod ast;
pub mod builtins;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in the source text. Lines and columns start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the text of the 1-based `line` in `source`, without its line ending.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}

/// Formats a positioned diagnostic against the source it came from.
///
/// ```text
/// Error: TypeMismatch (type mismatch: Number + Boolean)
/// -> main.sgl:1:11
///   |
/// 1 | let a = 5 + true;
///   | ----------^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }
    out.push_str(&format!("-> {}:{}\n", position.file, position));
    out.push_str(&format!("{:>padding$}\n", "|"));

    if let Some(line_text) = get_line_at_position(source, position.line) {
        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
        out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

        let column = position.column.max(1) as usize;
        let arrows = column.saturating_sub(removed_whitespace).max(1);
        out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    out
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", render_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

/// Stack size for a thread that runs programs. Deep recursion in a program
/// becomes deep recursion in the interpreter, and this fits
/// [`interpreter::interpreter::MAX_CALL_DEPTH`] nested calls.
pub const STACK_SIZE: usize = 256 * 1024 * 1024;

/// Why a run stopped before producing a value.
#[derive(Debug, PartialEq)]
pub enum Failure {
    Syntax(Vec<Error>),
    Type(Vec<Error>),
    Runtime(RuntimeError),
}

/// A program that parsed and type checked without errors.
#[derive(Debug)]
pub struct Checked {
    pub program: Program,
    pub program_type: Type,
    pub parsed_in: Duration,
    pub checked_in: Duration,
}

/// The checked type and canonical text of a program's final value.
#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub value_type: Type,
    pub value: String,
}

/// Parses and type checks `source`. Checking only starts when parsing
/// reported no errors.
pub fn check(source: &str, file: Option<String>) -> Result<Checked, Failure> {
    let parse_start = Instant::now();
    let (program, syntax_errors) = parse(source.to_string(), file);
    let parsed_in = parse_start.elapsed();

    if !syntax_errors.is_empty() {
        return Err(Failure::Syntax(syntax_errors));
    }

    let check_start = Instant::now();
    let (program_type, type_errors) = type_check(&program, &Builtins::new());
    let checked_in = check_start.elapsed();

    if !type_errors.is_empty() {
        return Err(Failure::Type(type_errors));
    }

    Ok(Checked {
        program,
        program_type,
        parsed_in,
        checked_in,
    })
}

/// Parses, checks and evaluates `source`, writing program output to `out`.
///
/// A program with syntax or type errors never runs.
pub fn run(source: &str, file: Option<String>, out: &mut dyn Write) -> Result<Outcome, Failure> {
    let checked = check(source, file)?;

    let builtins = Builtins::new();
    let value = execute(&checked.program, &builtins, out).map_err(Failure::Runtime)?;

    Ok(Outcome {
        value_type: checked.program_type,
        value: value.to_string(),
    })
}
