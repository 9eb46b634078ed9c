pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::{Identifier, Program};
use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

/// Turns a token stream into a best-effort statement list plus the errors
/// encountered along the way. Never panics on malformed input.
pub fn parse(toks: &[Token]) -> (Program, Vec<ParseError>) {
    if toks.is_empty() {
        return (Program { statements: Vec::new() }, Vec::new());
    }
    let mut parser = Parser::new(toks);
    let mut statements = Vec::new();
    while parser.current_kind() != &TokenKind::Eof {
        match parse_statement(&mut parser) {
            Ok(statement) => statements.push(statement),
            Err(error) => {
                parser.record(error);
                parser.synchronize();
            }
        }
    }
    (Program { statements }, parser.errors)
}

pub struct Parser<'a> {
    toks: &'a [Token],
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(toks: &'a [Token]) -> Self {
        Self {
            toks,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn current(&self) -> &'a Token {
        &self.toks[self.pos]
    }

    pub(crate) fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.toks.len() - 1 {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Ident => {
                let name = token.literal.clone();
                self.advance();
                Ok(Identifier { name })
            }
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let token = self.current();
        if token.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(kind, token))
        }
    }

    pub(crate) fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Skip past the next `;`, or stop at a block end, to resume statement
    /// parsing after an error.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::SemiColon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace | TokenKind::Eof => return,
                _ => self.advance(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let (toks, lex_errors) = lexer::lex(input);
            assert!(
                lex_errors.is_empty(),
                "lexical errors in {:?}: {:?}",
                input,
                lex_errors
            );
            let (program, errors) = parse(&toks);
            assert!(errors.is_empty(), "parse errors in {:?}: {:?}", input, errors);

            assert_eq!(program.to_string(), expected)
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b;", "((-a) * b);\n"),
            ("!-a;", "(!(-a));\n"),
            ("--5;", "(-(-5));\n"),
            ("a + b + c;", "((a + b) + c);\n"),
            ("a + b - c;", "((a + b) - c);\n"),
            ("a * b * c;", "((a * b) * c);\n"),
            ("a * b / c;", "((a * b) / c);\n"),
            ("a * b % c;", "((a * b) % c);\n"),
            ("a + b / c;", "(a + (b / c));\n"),
            ("a + b * c + d / e - f;", "(((a + (b * c)) + (d / e)) - f);\n"),
            ("3 + 4; -5 * 5;", "(3 + 4);\n((-5) * 5);\n"),
            ("5 > 4 == 3 < 4;", "(((5 > 4) == 3) < 4);\n"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5;", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));\n"),
            ("a or b and c;", "(a or (b and c));\n"),
            ("a and b == c;", "(a and (b == c));\n"),
            ("a = b + 1;", "(a = (b + 1));\n"),
            ("a = b = c;", "((a = b) = c);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouped_expressions() {
        let tests = vec![
            ("1 + (2 + 3) + 4;", "((1 + (2 + 3)) + 4);\n"),
            ("(5 + 5) * 2;", "((5 + 5) * 2);\n"),
            ("2 / (5 + 5);", "(2 / (5 + 5));\n"),
            ("-(5 + 5);", "(-(5 + 5));\n"),
            ("!(true == true);", "(!(true == true));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_and_member_expressions() {
        let tests = vec![
            ("a + add(b * c) + d;", "((a + add((b * c))) + d);\n"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8));",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));\n",
            ),
            ("a.b().c;", "a.b().c;\n"),
            ("o.a + 1;", "(o.a + 1);\n"),
            ("o.a = o.b;", "(o.a = o.b);\n"),
            ("fn(x) {return x;}(5);", "fn(x) {return x;}(5);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_number_literals() {
        let tests = vec![
            ("0x1F;", "31;\n"),
            ("0o17;", "15;\n"),
            ("0b101;", "5;\n"),
            ("4.25;", "4.25;\n"),
            ("4.0;", "4.0;\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_var_statements() {
        let tests = vec![
            ("var x = 5;", "var x = 5;\n"),
            ("var x;", "var x = null;\n"),
            ("var s = \"hi\";", "var s = \"hi\";\n"),
            ("var f = fn(a, b) { return a; };", "var f = fn(a, b) {return a;};\n"),
            ("var g = fn() {};", "var g = fn() {};\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_return_statements() {
        let tests = vec![
            ("return 5;", "return 5;\n"),
            ("return;", "return null;\n"),
            ("return a + b;", "return (a + b);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_if_statements() {
        let tests = vec![
            ("if x < y { x; }", "if (x < y) {x;}\n"),
            ("if x < y { x; } else { y; }", "if (x < y) {x;} else {y;}\n"),
            (
                "if a { 1; } else if b { 2; } else { 3; }",
                "if a {1;} else if b {2;} else {3;}\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_object_literals() {
        let tests = vec![
            ("var o = {};", "var o = {};\n"),
            ("var o = {a: 1, b: 2};", "var o = {a: 1, b: 2};\n"),
            ("var o = {a: 1, b};", "var o = {a: 1, b};\n"),
            ("var o = {a, b,};", "var o = {a, b};\n"),
            ("var o = {a: {b: 1}};", "var o = {a: {b: 1}};\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_nested_blocks() {
        let tests = vec![
            ("{ var x = 5; x;}", "{var x = 5; x;}\n"),
            ("{ { 1; } }", "{{1;}}\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_error_recovery() {
        let (toks, _) = lexer::lex("var 1 = 2; var x = 5; x;");
        let (program, errors) = parse(&toks);
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "var x = 5;\nx;\n");
    }

    #[test]
    fn test_missing_semicolon_keeps_statement() {
        let (toks, _) = lexer::lex("5");
        let (program, errors) = parse(&toks);
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "5;\n");
    }

    #[test]
    fn test_error_inside_block() {
        let (toks, _) = lexer::lex("{ var 1; var y = 2; }");
        let (program, errors) = parse(&toks);
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "{var y = 2;}\n");
    }

    #[test]
    fn test_errors_are_readable() {
        let (toks, _) = lexer::lex("var = 5;");
        let (_, errors) = parse(&toks);
        assert_eq!(
            errors[0].to_string(),
            "unexpected token '=', expected identifier"
        );

        let (toks, _) = lexer::lex("1 +");
        let (_, errors) = parse(&toks);
        assert_eq!(
            errors[0].to_string(),
            "unexpected end of input, expected expression"
        );
    }
}
