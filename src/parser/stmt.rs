use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::IdentifierExpr,
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let stmt_fn = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    if let Some(stmt_fn) = stmt_fn {
        return stmt_fn(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    let has_semicolon = parser.eat(TokenKind::Semicolon);

    Ok(Stmt::Expression(ExpressionStmt {
        expression,
        has_semicolon,
    }))
}

/// `let name (: Type)? = value ;?`
pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance();

    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = IdentifierExpr {
        name: name_token.value.clone(),
        token: name_token,
    };

    let type_annotation = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assignment)?;
    let mut value = parse_expr(parser, BindingPower::Default)?;

    // Named function literals can call themselves
    if let Expr::Function(function) = &mut value {
        function.name = Some(name.name.clone());
    }

    parser.eat(TokenKind::Semicolon);

    Ok(Stmt::Let(LetStmt {
        token,
        name,
        type_annotation,
        value,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance();

    let value = if parser.current_token().is_one_of_many(&[
        TokenKind::Semicolon,
        TokenKind::CloseCurly,
        TokenKind::EOF,
    ]) {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.eat(TokenKind::Semicolon);

    Ok(Stmt::Return(ReturnStmt { token, value }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// `{ statement* }`. Broken statements inside are recorded and skipped.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let token = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = vec![];
    while !parser
        .current_token()
        .is_one_of_many(&[TokenKind::CloseCurly, TokenKind::EOF])
    {
        if let Some(stmt) = parser.parse_stmt_or_recover() {
            statements.push(stmt);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt { token, statements })
}
