use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::{
    ast::{Expr, Stmt},
    expressions::IdentifierExpr,
    types::TypeAnnotation,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub token: Token,
    pub name: IdentifierExpr,
    pub type_annotation: Option<TypeAnnotation>,
    pub value: Expr,
}

impl Display for LetStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.type_annotation {
            Some(annotation) => write!(f, "let {}: {} = {};", self.name, annotation, self.value),
            None => write!(f, "let {} = {};", self.name, self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub token: Token,
    pub value: Option<Expr>,
}

impl Display for ReturnStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {};", value),
            None => write!(f, "return;"),
        }
    }
}

/// An expression in statement position.
///
/// Without a trailing semicolon the expression's value becomes the value of
/// the enclosing block.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub has_semicolon: bool,
}

impl Display for ExpressionStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_semicolon {
            write!(f, "{};", self.expression)
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }

        let statements = self
            .statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", statements.join(" "))
    }
}
