use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Num;

use crate::ast::{Expression, InfixOperationKind, PrefixOperationKind, Property};
use crate::lexer::TokenKind;
use crate::parser::error::Expected;
use crate::parser::statements::parse_block_statement;
use crate::parser::{ParseError, Parser};

// The cascade runs from the loosest level to the tightest: assignment →
// or → and → comparison → additive → multiplicative → unary →
// call/member → primary. Each binary level is left-associative via
// loop-and-rebuild.

pub(crate) fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_assignment(parser)
}

fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_or(parser)?;
    while parser.eat(TokenKind::Assign) {
        let value = parse_or(parser)?;
        left = Expression::Assignment {
            assignee: Box::new(left),
            value: Box::new(value),
        };
    }
    Ok(left)
}

fn parse_or(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_and(parser)?;
    while parser.eat(TokenKind::Or) {
        let right = parse_and(parser)?;
        left = Expression::InfixOperation(InfixOperationKind::Or, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_comparison(parser)?;
    while parser.eat(TokenKind::And) {
        let right = parse_comparison(parser)?;
        left = Expression::InfixOperation(InfixOperationKind::And, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_comparison(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_additive(parser)?;
    loop {
        let kind = match parser.current_kind() {
            TokenKind::Equal => InfixOperationKind::Equal,
            TokenKind::NotEqual => InfixOperationKind::NotEqual,
            TokenKind::LessThan => InfixOperationKind::LessThan,
            TokenKind::GreaterThan => InfixOperationKind::GreaterThan,
            _ => return Ok(left),
        };
        parser.advance();
        let right = parse_additive(parser)?;
        left = Expression::InfixOperation(kind, Box::new(left), Box::new(right));
    }
}

fn parse_additive(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_multiplicative(parser)?;
    loop {
        let kind = match parser.current_kind() {
            TokenKind::Plus => InfixOperationKind::Plus,
            TokenKind::Minus => InfixOperationKind::Minus,
            _ => return Ok(left),
        };
        parser.advance();
        let right = parse_multiplicative(parser)?;
        left = Expression::InfixOperation(kind, Box::new(left), Box::new(right));
    }
}

fn parse_multiplicative(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_unary(parser)?;
    loop {
        let kind = match parser.current_kind() {
            TokenKind::Asterisk => InfixOperationKind::Multiply,
            TokenKind::Slash => InfixOperationKind::Divide,
            TokenKind::Percent => InfixOperationKind::Modulo,
            _ => return Ok(left),
        };
        parser.advance();
        let right = parse_unary(parser)?;
        left = Expression::InfixOperation(kind, Box::new(left), Box::new(right));
    }
}

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let kind = match parser.current_kind() {
        TokenKind::Minus => PrefixOperationKind::Minus,
        TokenKind::Bang => PrefixOperationKind::Bang,
        _ => return parse_call_member(parser),
    };
    parser.advance();
    // Right recursion: chained prefixes apply innermost-first.
    let operand = parse_unary(parser)?;
    Ok(Expression::PrefixOperation(kind, Box::new(operand)))
}

fn parse_call_member(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut left = parse_primary(parser)?;
    loop {
        if parser.eat(TokenKind::Dot) {
            let property = parser.parse_ident()?;
            left = Expression::Member {
                object: Box::new(left),
                property,
            };
        } else if parser.eat(TokenKind::LParen) {
            let arguments = parse_arguments(parser)?;
            left = Expression::Call {
                function: Box::new(left),
                arguments,
            };
        } else {
            return Ok(left);
        }
    }
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    let mut arguments = Vec::new();
    loop {
        if parser.eat(TokenKind::RParen) {
            return Ok(arguments);
        }
        arguments.push(parse_expression(parser)?);
        if parser.eat(TokenKind::Comma) {
            continue;
        }
        parser.expect_token(TokenKind::RParen)?;
        return Ok(arguments);
    }
}

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let token = parser.current().clone();
    match token.kind {
        TokenKind::True => {
            parser.advance();
            Ok(Expression::BooleanLiteral(true))
        }
        TokenKind::False => {
            parser.advance();
            Ok(Expression::BooleanLiteral(false))
        }
        TokenKind::Null => {
            parser.advance();
            Ok(Expression::NullLiteral)
        }
        TokenKind::Ident => {
            parser.advance();
            Ok(Expression::Identifier(crate::ast::Identifier {
                name: token.literal,
            }))
        }
        TokenKind::Int => {
            parser.advance();
            integer_literal(&token.literal, 10)
        }
        TokenKind::Hex => {
            parser.advance();
            integer_literal(&token.literal, 16)
        }
        TokenKind::Octal => {
            parser.advance();
            integer_literal(&token.literal, 8)
        }
        TokenKind::Binary => {
            parser.advance();
            integer_literal(&token.literal, 2)
        }
        TokenKind::Float => {
            parser.advance();
            token
                .literal
                .parse::<f64>()
                .map(Expression::FloatLiteral)
                .map_err(|_| ParseError::InvalidFloat {
                    literal: token.literal,
                })
        }
        TokenKind::String => {
            parser.advance();
            Ok(Expression::StringLiteral(token.literal))
        }
        TokenKind::LParen => {
            parser.advance();
            let expression = parse_expression(parser)?;
            parser.expect_token(TokenKind::RParen)?;
            Ok(expression)
        }
        TokenKind::LBrace => parse_object_literal(parser),
        TokenKind::Function => parse_function_literal(parser),
        _ => {
            // Consume the offending token so statement recovery makes progress.
            parser.advance();
            Err(ParseError::unexpected_other(Expected::Expression, &token))
        }
    }
}

fn integer_literal(literal: &Rc<str>, radix: u32) -> Result<Expression, ParseError> {
    let digits = if radix == 10 { &literal[..] } else { &literal[2..] };
    BigInt::from_str_radix(digits, radix)
        .map(Expression::IntegerLiteral)
        .map_err(|_| ParseError::InvalidInteger {
            literal: literal.clone(),
        })
}

fn parse_object_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.advance();
    let mut properties = Vec::new();
    loop {
        if parser.eat(TokenKind::RBrace) {
            return Ok(Expression::ObjectLiteral(properties));
        }
        let key = parser.parse_ident()?;
        if parser.eat(TokenKind::Colon) {
            let value = parse_expression(parser)?;
            properties.push(Property {
                key,
                value: Some(value),
            });
        } else {
            properties.push(Property { key, value: None });
        }
        if parser.eat(TokenKind::Comma) {
            continue;
        }
        parser.expect_token(TokenKind::RBrace)?;
        return Ok(Expression::ObjectLiteral(properties));
    }
}

fn parse_function_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_parameters(parser)?;
    if parser.current_kind() != &TokenKind::LBrace {
        return Err(ParseError::unexpected_token(
            TokenKind::LBrace,
            parser.current(),
        ));
    }
    let body = parse_block_statement(parser);
    Ok(Expression::FunctionLiteral {
        parameters: Rc::new(parameters),
        body: Rc::new(body),
    })
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<crate::ast::Identifier>, ParseError> {
    let mut parameters = Vec::new();
    loop {
        if parser.eat(TokenKind::RParen) {
            return Ok(parameters);
        }
        parameters.push(parser.parse_ident()?);
        if parser.eat(TokenKind::Comma) {
            continue;
        }
        parser.expect_token(TokenKind::RParen)?;
        return Ok(parameters);
    }
}
