use std::io::Write;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{CallExpr, IfExpr},
        statements::BlockStmt,
    },
    builtins::{Arity, Builtins},
    errors::errors::RuntimeError,
};

use super::{
    environment::{EnvId, Environments},
    value::Value,
};

const EPSILON: f64 = 1e-9;

/// Default limit on nested function calls.
pub const MAX_CALL_DEPTH: usize = 5_000;

/// Anything that stops the normal flow of evaluation.
#[derive(Debug)]
pub enum Interrupt<'a> {
    /// A `return` unwinding to the nearest call, or to the top of the program.
    Return(Value<'a>),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt<'_> {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

pub type EvalResult<'a> = Result<Value<'a>, Interrupt<'a>>;

pub struct Interpreter<'a, 'o> {
    pub environments: Environments<'a>,
    builtins: &'a Builtins,
    out: &'o mut dyn Write,
    /// Function calls currently in progress.
    depth: usize,
    max_depth: usize,
}

impl<'a, 'o> Interpreter<'a, 'o> {
    pub fn new(builtins: &'a Builtins, out: &'o mut dyn Write, max_depth: usize) -> Self {
        Interpreter {
            environments: Environments::new(),
            builtins,
            out,
            depth: 0,
            max_depth,
        }
    }
}

/// Runs a checked program and returns the value of its last statement.
///
/// `print` and `println` write to `out`. A `return` at the top level ends the
/// program with the returned value.
pub fn execute<'a>(
    program: &'a Program,
    builtins: &'a Builtins,
    out: &mut dyn Write,
) -> Result<Value<'a>, RuntimeError> {
    execute_with_limits(program, builtins, out, MAX_CALL_DEPTH)
}

/// Like [`execute`], but fails with a runtime error once more than
/// `max_depth` function calls are nested.
///
/// Each nested call uses host stack, so the limit has to fit the stack of the
/// running thread. [`crate::STACK_SIZE`] fits [`MAX_CALL_DEPTH`].
pub fn execute_with_limits<'a>(
    program: &'a Program,
    builtins: &'a Builtins,
    out: &mut dyn Write,
    max_depth: usize,
) -> Result<Value<'a>, RuntimeError> {
    let mut interpreter = Interpreter::new(builtins, out, max_depth);
    let global = interpreter.environments.global();

    match evaluate_statements(&mut interpreter, &program.statements, global) {
        Ok(value) | Err(Interrupt::Return(value)) => Ok(value),
        Err(Interrupt::Error(error)) => Err(error),
    }
}

pub fn evaluate_statements<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    statements: &'a [Stmt],
    env: EnvId,
) -> EvalResult<'a> {
    let mut result = Value::Null;

    for stmt in statements {
        result = evaluate_stmt(interpreter, stmt, env)?;
    }

    Ok(result)
}

pub fn evaluate_stmt<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    stmt: &'a Stmt,
    env: EnvId,
) -> EvalResult<'a> {
    match stmt {
        Stmt::Let(let_stmt) => {
            let value = evaluate_expr(interpreter, &let_stmt.value, env)?;
            interpreter
                .environments
                .define(env, let_stmt.name.name.clone(), value);

            Ok(Value::Null)
        }
        Stmt::Return(return_stmt) => {
            let value = match &return_stmt.value {
                Some(value) => evaluate_expr(interpreter, value, env)?,
                None => Value::Null,
            };

            Err(Interrupt::Return(value))
        }
        Stmt::Expression(expression_stmt) => {
            let value = evaluate_expr(interpreter, &expression_stmt.expression, env)?;

            if expression_stmt.has_semicolon {
                Ok(Value::Null)
            } else {
                Ok(value)
            }
        }
        Stmt::Block(block) => evaluate_block(interpreter, block, env),
    }
}

/// Evaluates a block in a fresh scope enclosed by `env`.
pub fn evaluate_block<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    block: &'a BlockStmt,
    env: EnvId,
) -> EvalResult<'a> {
    let block_env = interpreter.environments.enclose(env);

    evaluate_statements(interpreter, &block.statements, block_env)
}

pub fn evaluate_expr<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    expr: &'a Expr,
    env: EnvId,
) -> EvalResult<'a> {
    match expr {
        Expr::Number(number) => Ok(Value::Number(number.value)),
        Expr::String(string) => Ok(Value::String(string.value.clone())),
        Expr::Boolean(boolean) => Ok(Value::Bool(boolean.value)),
        Expr::Identifier(identifier) => {
            if let Some(value) = interpreter.environments.get(env, &identifier.name) {
                return Ok(value.clone());
            }

            let builtins = interpreter.builtins;
            match builtins.get(&identifier.name) {
                Some(builtin) => Ok(Value::Builtin(builtin)),
                None => Err(RuntimeError::IdentifierNotFound {
                    name: identifier.name.clone(),
                }
                .into()),
            }
        }
        Expr::Assignment(assignment) => {
            let value = evaluate_expr(interpreter, &assignment.value, env)?;

            if !interpreter
                .environments
                .assign(env, &assignment.name, value)
            {
                return Err(RuntimeError::UndefinedVariable {
                    name: assignment.name.clone(),
                }
                .into());
            }

            Ok(Value::Null)
        }
        Expr::Prefix(prefix) => {
            let right = evaluate_expr(interpreter, &prefix.right, env)?;

            match (prefix.operator.as_str(), right) {
                ("-", Value::Number(value)) => Ok(Value::Number(-value)),
                ("!", Value::Bool(value)) => Ok(Value::Bool(!value)),
                (operator, right) => Err(RuntimeError::UnknownPrefixOperator {
                    operator: operator.to_string(),
                    operand: right.type_name().to_string(),
                }
                .into()),
            }
        }
        Expr::Infix(infix) => {
            let left = evaluate_expr(interpreter, &infix.left, env)?;
            let right = evaluate_expr(interpreter, &infix.right, env)?;

            Ok(evaluate_infix(&infix.operator, left, right)?)
        }
        Expr::If(if_expr) => evaluate_if_expr(interpreter, if_expr, env),
        Expr::Function(function) => Ok(Value::Function {
            literal: function,
            env,
        }),
        Expr::Call(call) => evaluate_call_expr(interpreter, call, env),
    }
}

pub fn evaluate_infix<'a>(
    operator: &str,
    left: Value<'a>,
    right: Value<'a>,
) -> Result<Value<'a>, RuntimeError> {
    match (&left, &right) {
        (Value::Number(l), Value::Number(r)) => {
            let (l, r) = (*l, *r);

            match operator {
                "+" => Ok(Value::Number(l + r)),
                "-" => Ok(Value::Number(l - r)),
                "*" => Ok(Value::Number(l * r)),
                "/" => Ok(Value::Number(l / r)),
                "<" => Ok(Value::Bool(l < r)),
                "<=" => Ok(Value::Bool(l <= r)),
                ">" => Ok(Value::Bool(l > r)),
                ">=" => Ok(Value::Bool(l >= r)),
                "==" => Ok(Value::Bool((l - r).abs() <= EPSILON)),
                "!=" => Ok(Value::Bool((l - r).abs() > EPSILON)),
                _ => Err(unknown_operator(operator, &left, &right)),
            }
        }
        (Value::String(l), Value::String(r)) if operator == "+" => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        _ => match operator {
            // Values of different kinds are never equal
            "==" => Ok(Value::Bool(left == right)),
            "!=" => Ok(Value::Bool(left != right)),
            _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
                left: left.type_name().to_string(),
                operator: operator.to_string(),
                right: right.type_name().to_string(),
            }),
            _ => Err(unknown_operator(operator, &left, &right)),
        },
    }
}

fn unknown_operator(operator: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnknownOperator {
        left: left.type_name().to_string(),
        operator: operator.to_string(),
        right: right.type_name().to_string(),
    }
}

fn evaluate_if_expr<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    if_expr: &'a IfExpr,
    env: EnvId,
) -> EvalResult<'a> {
    match evaluate_expr(interpreter, &if_expr.condition, env)? {
        Value::Bool(true) => evaluate_block(interpreter, &if_expr.consequence, env),
        Value::Bool(false) => match &if_expr.alternative {
            Some(alternative) => evaluate_block(interpreter, alternative, env),
            None => Ok(Value::Null),
        },
        other => Err(RuntimeError::NonBooleanCondition {
            received: other.type_name().to_string(),
        }
        .into()),
    }
}

fn evaluate_call_expr<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    call: &'a CallExpr,
    env: EnvId,
) -> EvalResult<'a> {
    let callee = evaluate_expr(interpreter, &call.function, env)?;

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(evaluate_expr(interpreter, argument, env)?);
    }

    Ok(apply_function(interpreter, callee, arguments)?)
}

/// Calls a function value. A `return` inside the body ends here and becomes
/// the call's result; errors keep propagating.
pub fn apply_function<'a>(
    interpreter: &mut Interpreter<'a, '_>,
    callee: Value<'a>,
    arguments: Vec<Value<'a>>,
) -> Result<Value<'a>, RuntimeError> {
    match callee {
        Value::Function { literal, env } => {
            if literal.parameters.len() != arguments.len() {
                return Err(RuntimeError::WrongArgumentCount {
                    expected: literal.parameters.len(),
                    received: arguments.len(),
                });
            }

            if interpreter.depth >= interpreter.max_depth {
                return Err(RuntimeError::CallDepthExceeded {
                    limit: interpreter.max_depth,
                });
            }

            let call_env = interpreter.environments.enclose(env);
            for (parameter, argument) in literal.parameters.iter().zip(arguments) {
                interpreter
                    .environments
                    .define(call_env, parameter.name.name.clone(), argument);
            }

            interpreter.depth += 1;
            let result = evaluate_statements(interpreter, &literal.body.statements, call_env);
            interpreter.depth -= 1;

            match result {
                Ok(value) | Err(Interrupt::Return(value)) => Ok(value),
                Err(Interrupt::Error(error)) => Err(error),
            }
        }
        Value::Builtin(builtin) => {
            if let Arity::Exact(expected) = builtin.arity {
                if expected != arguments.len() {
                    return Err(RuntimeError::WrongArgumentCount {
                        expected,
                        received: arguments.len(),
                    });
                }
            }

            (builtin.function)(&arguments, &mut *interpreter.out)
        }
        other => Err(RuntimeError::NotAFunction {
            received: other.type_name().to_string(),
        }),
    }
}
