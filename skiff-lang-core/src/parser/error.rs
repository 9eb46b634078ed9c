use std::rc::Rc;

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    PrematureEndOfInput { expected: Expected },
    #[error("unexpected token '{}', expected {expected}", .got.literal)]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("invalid integer literal '{literal}'")]
    InvalidInteger { literal: Rc<str> },
    #[error("invalid float literal '{literal}'")]
    InvalidFloat { literal: Rc<str> },
}

#[derive(Debug, PartialEq)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "'{}'", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

impl ParseError {
    pub(crate) fn unexpected_token(expected: TokenKind, got: &Token) -> ParseError {
        ParseError::unexpected_other(Expected::Token(expected), got)
    }

    pub(crate) fn unexpected_other(expected: Expected, got: &Token) -> ParseError {
        if got.kind == TokenKind::Eof {
            ParseError::PrematureEndOfInput { expected }
        } else {
            ParseError::UnexpectedToken {
                expected,
                got: got.clone(),
            }
        }
    }
}
