use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{CallExpr, FunctionExpr, IfExpr, InfixExpr, PrefixExpr},
        statements::{BlockStmt, LetStmt, ReturnStmt},
        types::TypeAnnotation,
    },
    builtins::{Arity, Builtins},
    errors::errors::{Error, TypeError},
    Position,
};

use super::types::Type;

#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Type>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }

    /// Binds `name` in this scope. Redeclaring a name replaces its type.
    pub fn declare_variable(&mut self, name: String, variable_type: Type) {
        self.variable_lookup.insert(name, variable_type);
    }

    pub fn get_variable(&self, name: &str) -> Option<&Type> {
        self.variable_lookup.get(name)
    }
}

#[derive(Debug)]
pub struct TypeChecker<'a> {
    builtins: &'a Builtins,
    /// Innermost scope last.
    environments: Vec<Environment>,
    /// Declared return type of the function whose body is being checked.
    current_return: Option<Type>,
    errors: Vec<Error>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(builtins: &'a Builtins) -> Self {
        TypeChecker {
            builtins,
            environments: vec![Environment::new()],
            current_return: None,
            errors: vec![],
        }
    }

    pub fn push_environment(&mut self) {
        self.environments.push(Environment::new());
    }

    pub fn pop_environment(&mut self) {
        // The global scope is never popped
        if self.environments.len() > 1 {
            self.environments.pop();
        }
    }

    pub fn declare_variable(&mut self, name: String, variable_type: Type) {
        if let Some(environment) = self.environments.last_mut() {
            environment.declare_variable(name, variable_type);
        }
    }

    /// Walks the scope chain outward. Builtins are not consulted.
    pub fn fetch_variable_type(&self, name: &str) -> Option<Type> {
        self.environments
            .iter()
            .rev()
            .find_map(|environment| environment.get_variable(name))
            .cloned()
    }

    /// Scope chain first, then the builtin table.
    pub fn resolve_identifier(&self, name: &str) -> Option<Type> {
        self.fetch_variable_type(name)
            .or_else(|| self.builtins.get(name).map(|builtin| builtin.get_type()))
    }

    pub fn add_error(&mut self, error: TypeError, position: &Position) {
        self.errors.push(Error::type_error(error, position.clone()));
    }

    /// Turns a written annotation into a type, reporting unknown names.
    pub fn convert_type(&mut self, annotation: &TypeAnnotation) -> Type {
        match annotation {
            TypeAnnotation::Simple(simple) => match Type::from_name(&simple.name) {
                Some(resolved) => resolved,
                None => {
                    self.add_error(
                        TypeError::UnknownType {
                            name: simple.name.clone(),
                        },
                        &simple.token.span.start,
                    );
                    Type::Unknown
                }
            },
            TypeAnnotation::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| self.convert_type(parameter))
                    .collect();
                let return_type = self.convert_type(&function.return_type);

                Type::function(parameters, return_type)
            }
        }
    }
}

/// Checks a whole program with a fresh global scope.
///
/// Returns the type of the last statement (`Void` for an empty program) and
/// every type error found, in the order they were encountered.
pub fn type_check(program: &Program, builtins: &Builtins) -> (Type, Vec<Error>) {
    let mut type_checker = TypeChecker::new(builtins);
    let program_type = type_check_statements(&mut type_checker, &program.statements);

    (program_type, type_checker.errors)
}

pub fn type_check_statements(type_checker: &mut TypeChecker, statements: &[Stmt]) -> Type {
    let mut last = Type::Void;

    for stmt in statements {
        last = type_check_stmt(type_checker, stmt);
    }

    last
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Type {
    match stmt {
        Stmt::Let(let_stmt) => type_check_let_stmt(type_checker, let_stmt),
        Stmt::Return(return_stmt) => type_check_return_stmt(type_checker, return_stmt),
        Stmt::Expression(expression_stmt) => {
            let expression_type = type_check_expr(type_checker, &expression_stmt.expression);

            if expression_stmt.has_semicolon {
                Type::Void
            } else {
                expression_type
            }
        }
        Stmt::Block(block) => type_check_block(type_checker, block),
    }
}

fn type_check_let_stmt(type_checker: &mut TypeChecker, stmt: &LetStmt) -> Type {
    let declared_type = stmt
        .type_annotation
        .as_ref()
        .map(|annotation| type_checker.convert_type(annotation));

    let value_type = type_check_expr(type_checker, &stmt.value);

    let declared_type = match declared_type {
        Some(declared_type) => {
            if !declared_type.is_unknown()
                && !value_type.is_unknown()
                && declared_type != value_type
            {
                type_checker.add_error(
                    TypeError::DeclarationMismatch {
                        declared: declared_type.to_string(),
                        received: value_type.to_string(),
                    },
                    &stmt.token.span.start,
                );
            }
            declared_type
        }
        None => value_type,
    };

    type_checker.declare_variable(stmt.name.name.clone(), declared_type);

    Type::Void
}

fn type_check_return_stmt(type_checker: &mut TypeChecker, stmt: &ReturnStmt) -> Type {
    let value_type = match &stmt.value {
        Some(value) => type_check_expr(type_checker, value),
        None => Type::Void,
    };

    // A top-level return ends the program with any value
    let expected = match &type_checker.current_return {
        Some(expected) => expected.clone(),
        None => return value_type,
    };

    if !expected.is_unknown() && !value_type.is_unknown() && expected != value_type {
        type_checker.add_error(
            TypeError::ReturnTypeMismatch {
                expected: expected.to_string(),
                received: value_type.to_string(),
            },
            &stmt.token.span.start,
        );
    }

    value_type
}

/// Checks a block in its own nested scope.
pub fn type_check_block(type_checker: &mut TypeChecker, block: &BlockStmt) -> Type {
    type_checker.push_environment();
    let block_type = type_check_statements(type_checker, &block.statements);
    type_checker.pop_environment();

    block_type
}

pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Type {
    match expr {
        Expr::Number(_) => Type::Number,
        Expr::String(_) => Type::String,
        Expr::Boolean(_) => Type::Bool,
        Expr::Identifier(identifier) => match type_checker.resolve_identifier(&identifier.name) {
            Some(identifier_type) => identifier_type,
            None => {
                type_checker.add_error(
                    TypeError::IdentifierNotFound {
                        name: identifier.name.clone(),
                    },
                    &identifier.token.span.start,
                );
                Type::Unknown
            }
        },
        Expr::Assignment(assignment) => {
            let value_type = type_check_expr(type_checker, &assignment.value);

            match type_checker.fetch_variable_type(&assignment.name) {
                Some(target_type) => {
                    if !target_type.is_unknown()
                        && !value_type.is_unknown()
                        && target_type != value_type
                    {
                        type_checker.add_error(
                            TypeError::AssignmentMismatch {
                                expected: target_type.to_string(),
                                received: value_type.to_string(),
                            },
                            &assignment.token.span.start,
                        );
                    }
                }
                None => type_checker.add_error(
                    TypeError::IdentifierNotFound {
                        name: assignment.name.clone(),
                    },
                    &assignment.token.span.start,
                ),
            }

            Type::Void
        }
        Expr::Prefix(prefix) => type_check_prefix_expr(type_checker, prefix),
        Expr::Infix(infix) => type_check_infix_expr(type_checker, infix),
        Expr::If(if_expr) => type_check_if_expr(type_checker, if_expr),
        Expr::Function(function) => type_check_function_expr(type_checker, function),
        Expr::Call(call) => type_check_call_expr(type_checker, call),
    }
}

fn type_check_prefix_expr(type_checker: &mut TypeChecker, prefix: &PrefixExpr) -> Type {
    let right = type_check_expr(type_checker, &prefix.right);

    match (prefix.operator.as_str(), &right) {
        (_, Type::Unknown) => Type::Unknown,
        ("-", Type::Number) => Type::Number,
        ("!", Type::Bool) => Type::Bool,
        _ => {
            type_checker.add_error(
                TypeError::UnknownPrefixOperator {
                    operator: prefix.operator.clone(),
                    operand: right.to_string(),
                },
                &prefix.token.span.start,
            );
            Type::Unknown
        }
    }
}

fn type_check_infix_expr(type_checker: &mut TypeChecker, infix: &InfixExpr) -> Type {
    let left = type_check_expr(type_checker, &infix.left);
    let right = type_check_expr(type_checker, &infix.right);

    if left.is_unknown() || right.is_unknown() {
        return Type::Unknown;
    }

    let operator = infix.operator.as_str();

    if left != right {
        type_checker.add_error(
            TypeError::TypeMismatch {
                left: left.to_string(),
                operator: infix.operator.clone(),
                right: right.to_string(),
            },
            &infix.token.span.start,
        );
        return Type::Unknown;
    }

    let result = match (operator, &left) {
        ("==" | "!=", _) => Some(Type::Bool),
        ("+", Type::Number) => Some(Type::Number),
        ("+", Type::String) => Some(Type::String),
        ("-" | "*" | "/", Type::Number) => Some(Type::Number),
        ("<" | "<=" | ">" | ">=", Type::Number) => Some(Type::Bool),
        _ => None,
    };

    match result {
        Some(result) => result,
        None => {
            type_checker.add_error(
                TypeError::UnknownOperator {
                    left: left.to_string(),
                    operator: infix.operator.clone(),
                    right: right.to_string(),
                },
                &infix.token.span.start,
            );
            Type::Unknown
        }
    }
}

fn type_check_if_expr(type_checker: &mut TypeChecker, if_expr: &IfExpr) -> Type {
    let condition = type_check_expr(type_checker, &if_expr.condition);

    if !condition.is_unknown() && condition != Type::Bool {
        type_checker.add_error(
            TypeError::NonBooleanCondition {
                received: condition.to_string(),
            },
            if_expr.condition.position(),
        );
    }

    let consequence = type_check_block(type_checker, &if_expr.consequence);

    let alternative = match &if_expr.alternative {
        Some(alternative) => type_check_block(type_checker, alternative),
        None => return Type::Void,
    };

    if consequence.is_unknown() || alternative.is_unknown() {
        return Type::Unknown;
    }

    if consequence != alternative {
        type_checker.add_error(
            TypeError::BranchMismatch {
                consequence: consequence.to_string(),
                alternative: alternative.to_string(),
            },
            &if_expr.token.span.start,
        );
        return Type::Unknown;
    }

    consequence
}

fn type_check_function_expr(type_checker: &mut TypeChecker, function: &FunctionExpr) -> Type {
    let parameter_types = function
        .parameters
        .iter()
        .map(|parameter| type_checker.convert_type(&parameter.type_annotation))
        .collect::<Vec<Type>>();
    let return_type = type_checker.convert_type(&function.return_type);

    let function_type = Type::function(parameter_types.clone(), return_type.clone());

    // Bound in the defining scope before the body so recursive calls resolve
    if let Some(name) = &function.name {
        type_checker.declare_variable(name.clone(), function_type.clone());
    }

    type_checker.push_environment();
    for (parameter, parameter_type) in function.parameters.iter().zip(parameter_types) {
        type_checker.declare_variable(parameter.name.name.clone(), parameter_type);
    }

    let outer_return = type_checker.current_return.replace(return_type.clone());
    let body_type = type_check_statements(type_checker, &function.body.statements);
    type_checker.current_return = outer_return;
    type_checker.pop_environment();

    if !return_type.is_unknown() && !body_type.is_unknown() && return_type != body_type {
        type_checker.add_error(
            TypeError::FunctionBodyMismatch {
                expected: return_type.to_string(),
                received: body_type.to_string(),
            },
            &function.token.span.start,
        );
    }

    function_type
}

fn type_check_call_expr(type_checker: &mut TypeChecker, call: &CallExpr) -> Type {
    // An identifier that is not shadowed by a binding calls the builtin directly
    if let Expr::Identifier(identifier) = call.function.as_ref() {
        let builtins = type_checker.builtins;

        if type_checker.fetch_variable_type(&identifier.name).is_none() {
            if let Some(builtin) = builtins.get(&identifier.name) {
                let argument_types = type_check_arguments(type_checker, call);

                match builtin.arity {
                    Arity::Exact(_) => check_arguments(
                        type_checker,
                        call,
                        &builtin.param_types,
                        &argument_types,
                    ),
                    Arity::Variadic => {
                        let parameter_type = builtin
                            .param_types
                            .first()
                            .cloned()
                            .unwrap_or(Type::Unknown);
                        let parameter_types = vec![parameter_type; argument_types.len()];
                        check_arguments(type_checker, call, &parameter_types, &argument_types);
                    }
                }

                return builtin.return_type.clone();
            }
        }
    }

    let callee = type_check_expr(type_checker, &call.function);
    let argument_types = type_check_arguments(type_checker, call);

    match callee {
        Type::Unknown => Type::Unknown,
        Type::Function {
            parameters,
            return_type,
        } => {
            check_arguments(type_checker, call, &parameters, &argument_types);
            *return_type
        }
        other => {
            type_checker.add_error(
                TypeError::NotAFunction {
                    received: other.to_string(),
                },
                &call.token.span.start,
            );
            Type::Unknown
        }
    }
}

fn type_check_arguments(type_checker: &mut TypeChecker, call: &CallExpr) -> Vec<Type> {
    call.arguments
        .iter()
        .map(|argument| type_check_expr(type_checker, argument))
        .collect()
}

/// Compares arguments with parameters. An `Unknown` on either side always matches.
fn check_arguments(
    type_checker: &mut TypeChecker,
    call: &CallExpr,
    parameters: &[Type],
    arguments: &[Type],
) {
    if parameters.len() != arguments.len() {
        type_checker.add_error(
            TypeError::WrongArgumentCount {
                expected: parameters.len(),
                received: arguments.len(),
            },
            &call.token.span.start,
        );
        return;
    }

    for (index, (parameter, argument)) in parameters.iter().zip(arguments).enumerate() {
        if parameter.is_unknown() || argument.is_unknown() || parameter == argument {
            continue;
        }

        type_checker.add_error(
            TypeError::ArgumentTypeMismatch {
                index: index + 1,
                expected: parameter.to_string(),
                received: argument.to_string(),
            },
            call.arguments[index].position(),
        );
    }
}
