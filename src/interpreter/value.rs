use std::fmt::Display;

use crate::{ast::expressions::FunctionExpr, builtins::Builtin};

use super::environment::EnvId;

/// A runtime value. Functions borrow their literal from the program being run.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Function {
        literal: &'a FunctionExpr,
        /// Scope the literal was evaluated in.
        env: EnvId,
    },
    Builtin(&'a Builtin),
}

impl<'a> Value<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Bool(_) => "Boolean",
            Value::Null => "Null",
            Value::Function { .. } => "Function",
            Value::Builtin(_) => "Builtin",
        }
    }
}

/// Exact comparison. Functions are equal only when they are the same literal
/// closed over the same scope.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Null, Value::Null) => true,
            (
                Value::Function {
                    literal: left,
                    env: left_env,
                },
                Value::Function {
                    literal: right,
                    env: right_env,
                },
            ) => std::ptr::eq(*left, *right) && left_env == right_env,
            (Value::Builtin(left), Value::Builtin(right)) => left.name == right.name,
            _ => false,
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{}", format_number(*value)),
            Value::String(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::Function { literal, .. } => write!(f, "{}", literal),
            Value::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
        }
    }
}

/// Shortest decimal text for a number, never in exponent form.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        if value > 0.0 {
            String::from("Inf")
        } else {
            String::from("-Inf")
        }
    } else {
        value.to_string()
    }
}
