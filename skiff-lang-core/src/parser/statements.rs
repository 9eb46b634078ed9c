use crate::ast::{
    BlockStatement, Expression, IfBranch, IfStatement, ReturnStatement, Statement, VarStatement,
};
use crate::lexer::TokenKind;
use crate::parser::expressions::parse_expression;
use crate::parser::{ParseError, Parser};

pub(crate) fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.current_kind() {
        TokenKind::Var => parse_var_statement(parser).map(Statement::Var),
        TokenKind::Return => parse_return_statement(parser).map(Statement::Return),
        TokenKind::If => parse_if_statement(parser).map(Statement::If),
        TokenKind::LBrace => Ok(Statement::Block(parse_block_statement(parser))),
        _ => parse_expression_statement(parser),
    }
}

fn parse_var_statement(parser: &mut Parser) -> Result<VarStatement, ParseError> {
    parser.advance();
    let identifier = parser.parse_ident()?;
    if parser.eat(TokenKind::SemiColon) {
        return Ok(VarStatement {
            identifier,
            value: Expression::NullLiteral,
        });
    }
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser)?;
    parser.expect_token(TokenKind::SemiColon)?;
    Ok(VarStatement { identifier, value })
}

fn parse_return_statement(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    parser.advance();
    if parser.eat(TokenKind::SemiColon) {
        return Ok(ReturnStatement {
            value: Expression::NullLiteral,
        });
    }
    let value = parse_expression(parser)?;
    parser.expect_token(TokenKind::SemiColon)?;
    Ok(ReturnStatement { value })
}

fn parse_if_statement(parser: &mut Parser) -> Result<IfStatement, ParseError> {
    parser.advance();
    let mut branches = Vec::new();
    branches.push(parse_if_branch(parser)?);

    let mut alternative = None;
    while parser.eat(TokenKind::Else) {
        if parser.eat(TokenKind::If) {
            branches.push(parse_if_branch(parser)?);
        } else {
            if parser.current_kind() != &TokenKind::LBrace {
                return Err(ParseError::unexpected_token(
                    TokenKind::LBrace,
                    parser.current(),
                ));
            }
            alternative = Some(parse_block_statement(parser));
            break;
        }
    }

    Ok(IfStatement {
        branches,
        alternative,
    })
}

fn parse_if_branch(parser: &mut Parser) -> Result<IfBranch, ParseError> {
    let condition = parse_expression(parser)?;
    if parser.current_kind() != &TokenKind::LBrace {
        return Err(ParseError::unexpected_token(
            TokenKind::LBrace,
            parser.current(),
        ));
    }
    let block = parse_block_statement(parser);
    Ok(IfBranch { condition, block })
}

fn parse_expression_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let expression = parse_expression(parser)?;
    // Keep the statement even when the terminator is missing.
    if !parser.eat(TokenKind::SemiColon) {
        let error = ParseError::unexpected_token(TokenKind::SemiColon, parser.current());
        parser.record(error);
    }
    Ok(Statement::Expression(expression))
}

/// Infallible: interior errors are recorded and parsing resumes with the
/// next statement of the block. Expects the current token to be `{`.
pub(crate) fn parse_block_statement(parser: &mut Parser) -> BlockStatement {
    parser.advance();
    let mut statements = Vec::new();
    while !matches!(parser.current_kind(), TokenKind::RBrace | TokenKind::Eof) {
        match parse_statement(parser) {
            Ok(statement) => statements.push(statement),
            Err(error) => {
                parser.record(error);
                parser.synchronize();
            }
        }
    }
    if !parser.eat(TokenKind::RBrace) {
        let error = ParseError::unexpected_token(TokenKind::RBrace, parser.current());
        parser.record(error);
    }
    BlockStatement { statements }
}
