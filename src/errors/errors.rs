use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A positioned diagnostic produced by the parser or the type checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn syntax(error: SyntaxError, position: Position) -> Self {
        Error::new(ErrorImpl::Syntax(error), position)
    }

    pub fn type_error(error: TypeError, position: Position) -> Self {
        Error::new(ErrorImpl::Type(error), position)
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Syntax(error) => match error {
                SyntaxError::UnexpectedToken { .. } => "UnexpectedToken",
                SyntaxError::NoPrefixParseFn { .. } => "NoPrefixParseFn",
                SyntaxError::NumberParseError { .. } => "NumberParseError",
            },
            ErrorImpl::Type(error) => match error {
                TypeError::UnknownType { .. } => "UnknownType",
                TypeError::IdentifierNotFound { .. } => "IdentifierNotFound",
                TypeError::DeclarationMismatch { .. } => "DeclarationMismatch",
                TypeError::AssignmentMismatch { .. } => "AssignmentMismatch",
                TypeError::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
                TypeError::FunctionBodyMismatch { .. } => "FunctionBodyMismatch",
                TypeError::TypeMismatch { .. } => "TypeMismatch",
                TypeError::UnknownOperator { .. } => "UnknownOperator",
                TypeError::UnknownPrefixOperator { .. } => "UnknownPrefixOperator",
                TypeError::NonBooleanCondition { .. } => "NonBooleanCondition",
                TypeError::BranchMismatch { .. } => "BranchMismatch",
                TypeError::NotAFunction { .. } => "NotAFunction",
                TypeError::WrongArgumentCount { .. } => "WrongArgumentCount",
                TypeError::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            },
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Syntax(SyntaxError::NumberParseError { .. }) => ErrorTip::None,
            _ => ErrorTip::Suggestion(self.internal_error.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error(transparent)]
    Syntax(SyntaxError),
    #[error(transparent)]
    Type(TypeError),
}

/// Grammar violations found while parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("expected next token to be {expected}, got {received} instead")]
    UnexpectedToken { expected: String, received: String },
    #[error("no prefix parse function for {token} found")]
    NoPrefixParseFn { token: String },
    #[error("could not parse {token:?} as Number")]
    NumberParseError { token: String },
}

/// Static type rule violations found by the checker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("unknown type: {name}")]
    UnknownType { name: String },
    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },
    #[error("type mismatch: declared {declared} but got {received}")]
    DeclarationMismatch { declared: String, received: String },
    #[error("assignment type mismatch: expected {expected}, got {received}")]
    AssignmentMismatch { expected: String, received: String },
    #[error("return type mismatch: expected {expected}, got {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("function body type mismatch: expected {expected}, got {received}")]
    FunctionBodyMismatch { expected: String, received: String },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch { left: String, operator: String, right: String },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownOperator { left: String, operator: String, right: String },
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator { operator: String, operand: String },
    #[error("if condition must be Boolean, got {received}")]
    NonBooleanCondition { received: String },
    #[error("if branches have different types: {consequence} and {alternative}")]
    BranchMismatch { consequence: String, alternative: String },
    #[error("not a function: {received}")]
    NotAFunction { received: String },
    #[error("wrong number of arguments: expected {expected}, got {received}")]
    WrongArgumentCount { expected: usize, received: usize },
    #[error("argument {index} type mismatch: expected {expected}, got {received}")]
    ArgumentTypeMismatch { index: usize, expected: String, received: String },
}

/// Failures raised while evaluating a checked program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch { left: String, operator: String, right: String },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownOperator { left: String, operator: String, right: String },
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator { operator: String, operand: String },
    #[error("type mismatch: expected Boolean but got {received}")]
    NonBooleanCondition { received: String },
    #[error("not a function: {received}")]
    NotAFunction { received: String },
    #[error("wrong number of arguments: expected {expected}, got {received}")]
    WrongArgumentCount { expected: usize, received: usize },
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
    #[error("len not defined for type {received}")]
    LenUnsupported { received: String },
    #[error("{builtin} only accepts strings, got {received}")]
    NonStringArgument { builtin: String, received: String },
    #[error("failed to write output: {message}")]
    Output { message: String },
}
