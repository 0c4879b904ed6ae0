use std::fmt::Display;

use crate::{lexer::tokens::Token, Position};

use super::{
    expressions::{
        AssignmentExpr, BooleanExpr, CallExpr, FunctionExpr, IdentifierExpr, IfExpr, InfixExpr,
        NumberExpr, PrefixExpr, StringExpr,
    },
    statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
};

/// Statement node.
///
/// The set of statements is closed; passes match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
    Block(BlockStmt),
}

impl Stmt {
    /// Returns the token that introduced the statement.
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let(stmt) => &stmt.token,
            Stmt::Return(stmt) => &stmt.token,
            Stmt::Expression(stmt) => stmt.expression.token(),
            Stmt::Block(stmt) => &stmt.token,
        }
    }

    pub fn position(&self) -> &Position {
        &self.token().span.start
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let(stmt) => stmt.fmt(f),
            Stmt::Return(stmt) => stmt.fmt(f),
            Stmt::Expression(stmt) => stmt.fmt(f),
            Stmt::Block(stmt) => stmt.fmt(f),
        }
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(IdentifierExpr),
    Assignment(AssignmentExpr),
    Number(NumberExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(FunctionExpr),
    Call(CallExpr),
}

impl Expr {
    /// Returns the token that introduced the expression. For infix
    /// expressions this is the operator, for calls the opening parenthesis.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(expr) => &expr.token,
            Expr::Assignment(expr) => &expr.token,
            Expr::Number(expr) => &expr.token,
            Expr::String(expr) => &expr.token,
            Expr::Boolean(expr) => &expr.token,
            Expr::Prefix(expr) => &expr.token,
            Expr::Infix(expr) => &expr.token,
            Expr::If(expr) => &expr.token,
            Expr::Function(expr) => &expr.token,
            Expr::Call(expr) => &expr.token,
        }
    }

    pub fn position(&self) -> &Position {
        &self.token().span.start
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(expr) => expr.fmt(f),
            Expr::Assignment(expr) => expr.fmt(f),
            Expr::Number(expr) => expr.fmt(f),
            Expr::String(expr) => expr.fmt(f),
            Expr::Boolean(expr) => expr.fmt(f),
            Expr::Prefix(expr) => expr.fmt(f),
            Expr::Infix(expr) => expr.fmt(f),
            Expr::If(expr) => expr.fmt(f),
            Expr::Function(expr) => expr.fmt(f),
            Expr::Call(expr) => expr.fmt(f),
        }
    }
}

/// Root of a parsed source unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", rendered.join("\n"))
    }
}
