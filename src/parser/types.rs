//! Type annotation parsing.
//!
//! Annotations are either a bare name (`Number`) or a function type
//! (`(Number, String) => Boolean`). Like expressions they dispatch through a
//! NUD table keyed on the first token.

use std::collections::HashMap;

use crate::{
    ast::types::{FunctionType, SimpleType, TypeAnnotation},
    errors::errors::{Error, SyntaxError},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeAnnotation, Error>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_simple_type);
    parser.type_nud(TokenKind::OpenParen, parse_function_type);
}

pub fn parse_simple_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    Ok(TypeAnnotation::Simple(SimpleType {
        name: token.value.clone(),
        token,
    }))
}

pub fn parse_function_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            parameters.push(parse_type(parser)?);

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Arrow)?;
    let return_type = parse_type(parser)?;

    Ok(TypeAnnotation::Function(FunctionType {
        token,
        parameters,
        return_type: Box::new(return_type),
    }))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token_kind = parser.current_token_kind();

    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(nud) => nud(parser),
        None => Err(Error::syntax(
            SyntaxError::UnexpectedToken {
                expected: TokenKind::Identifier.to_string(),
                received: token_kind.to_string(),
            },
            parser.get_position(),
        )),
    }
}
