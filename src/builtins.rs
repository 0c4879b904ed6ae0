//! Built-in functions.
//!
//! The registry is built once and handed by reference to both the type
//! checker (which reads the signatures) and the interpreter (which calls the
//! implementations).

use std::{collections::HashMap, fmt::Debug, io::Write};

use crate::{errors::errors::RuntimeError, interpreter::value::Value, type_checker::types::Type};

pub type BuiltinFn =
    for<'a> fn(&[Value<'a>], &mut dyn Write) -> Result<Value<'a>, RuntimeError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    Exact(usize),
    /// Any number of arguments, each of the single declared parameter type.
    Variadic,
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub param_types: Vec<Type>,
    pub return_type: Type,
    pub function: BuiltinFn,
}

impl Builtin {
    /// The type a builtin has when used as a value.
    pub fn get_type(&self) -> Type {
        Type::function(self.param_types.clone(), self.return_type.clone())
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("param_types", &self.param_types)
            .field("return_type", &self.return_type)
            .finish()
    }
}

#[derive(Debug)]
pub struct Builtins {
    lookup: HashMap<&'static str, Builtin>,
}

impl Builtins {
    pub fn new() -> Self {
        let mut builtins = Builtins {
            lookup: HashMap::new(),
        };

        builtins.register("len", Arity::Exact(1), vec![Type::String], Type::Number, len);
        builtins.register("print", Arity::Variadic, vec![Type::String], Type::Void, print);
        builtins.register("println", Arity::Variadic, vec![Type::String], Type::Void, println);
        builtins.register("string", Arity::Exact(1), vec![Type::Unknown], Type::String, string);

        builtins
    }

    fn register(
        &mut self,
        name: &'static str,
        arity: Arity,
        param_types: Vec<Type>,
        return_type: Type,
        function: BuiltinFn,
    ) {
        self.lookup.insert(
            name,
            Builtin {
                name,
                arity,
                param_types,
                return_type,
                function,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.lookup.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Builtins::new()
    }
}

fn len<'a>(args: &[Value<'a>], _out: &mut dyn Write) -> Result<Value<'a>, RuntimeError> {
    match args.first() {
        Some(Value::String(value)) => Ok(Value::Number(value.len() as f64)),
        Some(other) => Err(RuntimeError::LenUnsupported {
            received: other.type_name().to_string(),
        }),
        None => Err(RuntimeError::WrongArgumentCount {
            expected: 1,
            received: 0,
        }),
    }
}

fn join_strings(builtin: &str, args: &[Value]) -> Result<String, RuntimeError> {
    let mut parts = Vec::with_capacity(args.len());

    for arg in args {
        match arg {
            Value::String(value) => parts.push(value.as_str()),
            other => {
                return Err(RuntimeError::NonStringArgument {
                    builtin: builtin.to_string(),
                    received: other.type_name().to_string(),
                })
            }
        }
    }

    Ok(parts.join(" "))
}

fn write_output(out: &mut dyn Write, text: &str) -> Result<(), RuntimeError> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|error| RuntimeError::Output {
            message: error.to_string(),
        })
}

fn print<'a>(args: &[Value<'a>], out: &mut dyn Write) -> Result<Value<'a>, RuntimeError> {
    let text = join_strings("print", args)?;
    write_output(out, &text)?;

    Ok(Value::Null)
}

fn println<'a>(args: &[Value<'a>], out: &mut dyn Write) -> Result<Value<'a>, RuntimeError> {
    let mut text = join_strings("println", args)?;
    text.push('\n');
    write_output(out, &text)?;

    Ok(Value::Null)
}

fn string<'a>(args: &[Value<'a>], _out: &mut dyn Write) -> Result<Value<'a>, RuntimeError> {
    match args.first() {
        Some(value) => Ok(Value::String(value.to_string())),
        None => Err(RuntimeError::WrongArgumentCount {
            expected: 1,
            received: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_signatures() {
        let builtins = Builtins::new();

        let len = builtins.get("len").unwrap();
        assert_eq!(len.arity, Arity::Exact(1));
        assert_eq!(len.get_type().to_string(), "(String) -> Number");

        let println = builtins.get("println").unwrap();
        assert_eq!(println.arity, Arity::Variadic);
        assert_eq!(println.get_type().to_string(), "(String) -> Void");

        assert!(builtins.contains("print"));
        assert!(builtins.contains("string"));
        assert!(!builtins.contains("format"));
    }

    #[test]
    fn test_len_counts_bytes() {
        let mut out = Vec::new();
        let result = len(&[Value::String("héllo".to_string())], &mut out).unwrap();

        assert_eq!(result, Value::Number(6.0));
    }

    #[test]
    fn test_len_rejects_numbers() {
        let mut out = Vec::new();
        let error = len(&[Value::Number(1.0)], &mut out).unwrap_err();

        assert_eq!(error.to_string(), "len not defined for type Number");
    }

    #[test]
    fn test_println_joins_with_spaces() {
        let mut out = Vec::new();
        let args = [Value::String("a".to_string()), Value::String("b".to_string())];

        println(&args, &mut out).unwrap();
        print(&args, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "a b\na b");
    }

    #[test]
    fn test_print_rejects_non_strings() {
        let mut out = Vec::new();
        let error = print(&[Value::Bool(true)], &mut out).unwrap_err();

        assert_eq!(error.to_string(), "print only accepts strings, got Boolean");
        assert!(out.is_empty());
    }

    #[test]
    fn test_string_uses_canonical_text() {
        let mut out = Vec::new();

        assert_eq!(
            string(&[Value::Number(2.5)], &mut out).unwrap(),
            Value::String("2.5".to_string())
        );
        assert_eq!(
            string(&[Value::Null], &mut out).unwrap(),
            Value::String("null".to_string())
        );
    }
}
