//! Type annotations as written in source.
//!
//! These are syntax only. The type checker resolves them into
//! `type_checker::types::Type` values.

use std::fmt::Display;

use crate::lexer::tokens::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    Simple(SimpleType),
    Function(FunctionType),
}

impl TypeAnnotation {
    pub fn token(&self) -> &Token {
        match self {
            TypeAnnotation::Simple(simple) => &simple.token,
            TypeAnnotation::Function(function) => &function.token,
        }
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeAnnotation::Simple(simple) => write!(f, "{}", simple.name),
            TypeAnnotation::Function(function) => function.fmt(f),
        }
    }
}

/// A named type such as `Number`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleType {
    pub token: Token,
    pub name: String,
}

/// `(P1, P2) => R`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub token: Token,
    pub parameters: Vec<TypeAnnotation>,
    pub return_type: Box<TypeAnnotation>,
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<String>>();

        write!(f, "({}) => {}", parameters.join(", "), self.return_type)
    }
}
