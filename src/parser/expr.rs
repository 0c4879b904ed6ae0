use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, BooleanExpr, CallExpr, FunctionExpr, IdentifierExpr, IfExpr,
            InfixExpr, NumberExpr, Parameter, PrefixExpr, StringExpr,
        },
    },
    errors::errors::{Error, SyntaxError},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::syntax(
                SyntaxError::NoPrefixParseFn {
                    token: token_kind.to_string(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than the caller, keep extending lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        let led_bp = parser.current_binding_power();
        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

/// An identifier, or an assignment when the identifier is directly followed by `=`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;

        return Ok(Expr::Assignment(AssignmentExpr {
            name: token.value.clone(),
            token,
            value: Box::new(value),
        }));
    }

    Ok(Expr::Identifier(IdentifierExpr {
        name: token.value.clone(),
        token,
    }))
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let value = match parser.current_token().value.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            return Err(Error::syntax(
                SyntaxError::NumberParseError {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    Ok(Expr::Number(NumberExpr {
        token: parser.advance(),
        value,
    }))
}

pub fn parse_string_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    Ok(Expr::String(StringExpr {
        value: token.value.clone(),
        token,
    }))
}

pub fn parse_boolean_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    Ok(Expr::Boolean(BooleanExpr {
        value: token.kind == TokenKind::True,
        token,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let right = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_infix_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Infix(InfixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `if (condition) { ... } else { ... }`
pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let consequence = parse_block(parser)?;

    let alternative = if parser.eat(TokenKind::Else) {
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Expr::If(IfExpr {
        token,
        condition: Box::new(condition),
        consequence,
        alternative,
    }))
}

/// `fun(a: T, b: U): R { ... }`
pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let name_token = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let type_annotation = parse_type(parser)?;

            parameters.push(Parameter {
                name: IdentifierExpr {
                    name: name_token.value.clone(),
                    token: name_token,
                },
                type_annotation,
            });

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Colon)?;
    let return_type = parse_type(parser)?;

    let body = parse_block(parser)?;

    Ok(Expr::Function(FunctionExpr {
        token,
        name: None,
        parameters,
        return_type,
        body,
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let token = parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        token,
        function: Box::new(left),
        arguments,
    }))
}
