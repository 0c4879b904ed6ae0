//! Parser state and the program entry point.
//!
//! The parser pulls tokens from the lexer on demand and keeps a two-token
//! window (`current` and `peek`). It owns the lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix positions
//! - LED (left denotation) handlers for infix positions
//! - Binding powers for operator precedence
//! - Type annotation handlers
//!
//! Syntax errors are collected rather than returned, so a single run can
//! report every broken statement.

use std::{collections::HashMap, mem};

use crate::{
    ast::ast::{Program, Stmt},
    errors::errors::{Error, SyntaxError},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    /// Creates a parser with every lookup table populated.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            peek,
            errors: vec![],
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);

        parser
    }

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let peek = mem::replace(&mut self.peek, next);
        mem::replace(&mut self.current, peek)
    }

    /// Consumes the current token if it has the expected kind.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            return Err(Error::syntax(
                SyntaxError::UnexpectedToken {
                    expected: expected_kind.to_string(),
                    received: self.current.kind.to_string(),
                },
                self.get_position(),
            ));
        }

        Ok(self.advance())
    }

    /// Consumes the current token when it has the given kind. Returns whether it did.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current.kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Binding power of the current token, `Default` if it is not an operator.
    pub fn current_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current.kind)
            .unwrap_or(&BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Does not touch the binding power table, so a token may have both a
    /// prefix role and an infix precedence (`-`, `(`).
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Parses one statement, recording its error and resynchronising on failure.
    pub fn parse_stmt_or_recover(&mut self) -> Option<Stmt> {
        let start = self.get_position();

        match parse_stmt(self) {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.errors.push(error);
                self.synchronize(&start);
                None
            }
        }
    }

    /// Skips to the end of the broken statement: past the next `;`, or up to
    /// a `}` or EOF. Always makes progress.
    fn synchronize(&mut self, start: &Position) {
        while !self.current.is_one_of_many(&[
            TokenKind::Semicolon,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]) {
            self.advance();
        }

        if self.current.kind == TokenKind::Semicolon
            || (self.has_tokens() && self.get_position() == *start)
        {
            self.advance();
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while self.has_tokens() {
            if let Some(stmt) = self.parse_stmt_or_recover() {
                statements.push(stmt);
            }
        }

        Program { statements }
    }
}

/// Parses a whole source unit.
///
/// Returns the program built from every statement that parsed, together with
/// all syntax errors in source order.
pub fn parse(source: String, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(Lexer::new(source, file));
    let program = parser.parse_program();

    (program, parser.errors)
}
