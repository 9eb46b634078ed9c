use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    // Operators
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Bang,

    Equal,
    NotEqual,
    LessThan,
    GreaterThan,

    Dot,
    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Literals
    Int,
    Float,
    Binary,
    Octal,
    Hex,
    String,
    Ident,

    // Keywords
    Var,
    Function,
    Return,
    If,
    Else,
    True,
    False,
    Null,
    And,
    Or,

    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let text = match self {
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            Bang => "!",
            Equal => "==",
            NotEqual => "!=",
            LessThan => "<",
            GreaterThan => ">",
            Dot => ".",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Int => "integer literal",
            Float => "float literal",
            Binary => "binary literal",
            Octal => "octal literal",
            Hex => "hex literal",
            String => "string literal",
            Ident => "identifier",
            Var => "var",
            Function => "fn",
            Return => "return",
            If => "if",
            Else => "else",
            True => "true",
            False => "false",
            Null => "null",
            And => "and",
            Or => "or",
            Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Rc<str>,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<Rc<str>>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "var" => Some(TokenKind::Var),
        "fn" => Some(TokenKind::Function),
        "return" => Some(TokenKind::Return),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    #[error("unexpected character '{found}', expected {expected}")]
    UnexpectedCharacter {
        expected: &'static str,
        found: char,
    },
}

/// Scans `src` in a single pass. Errors are recorded rather than aborting the
/// scan; the token stream always ends with an `Eof` token.
pub fn lex(src: &str) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    toks: Vec<Token>,
    errs: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            iter: src.char_indices().peekable(),
            toks: Vec::new(),
            errs: Vec::new(),
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.src.len())
    }

    fn peek_char(&mut self) -> char {
        self.iter.peek().map(|(_, ch)| *ch).unwrap_or('\0')
    }

    fn push(&mut self, kind: TokenKind, literal: &'static str) {
        self.toks.push(Token::new(kind, literal));
    }

    fn push_span(&mut self, kind: TokenKind, start: usize) {
        let end = self.next_idx();
        self.toks.push(Token::new(kind, &self.src[start..end]));
    }

    fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while let Some((idx, ch)) = self.iter.next() {
            match ch {
                ' ' | '\t' | '\x0b' | '\x0c' | '\r' | '\n' => {}
                '=' => {
                    if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                        self.push(TokenKind::Equal, "==");
                    } else {
                        self.push(TokenKind::Assign, "=");
                    }
                }
                '!' => {
                    if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                        self.push(TokenKind::NotEqual, "!=");
                    } else {
                        self.push(TokenKind::Bang, "!");
                    }
                }
                '/' => {
                    if self.iter.next_if(|(_, ch)| *ch == '/').is_some() {
                        while self.iter.next_if(|(_, ch)| *ch != '\n').is_some() {}
                    } else {
                        self.push(TokenKind::Slash, "/");
                    }
                }
                '+' => self.push(TokenKind::Plus, "+"),
                '-' => self.push(TokenKind::Minus, "-"),
                '*' => self.push(TokenKind::Asterisk, "*"),
                '%' => self.push(TokenKind::Percent, "%"),
                '<' => self.push(TokenKind::LessThan, "<"),
                '>' => self.push(TokenKind::GreaterThan, ">"),
                '.' => self.push(TokenKind::Dot, "."),
                ',' => self.push(TokenKind::Comma, ","),
                ':' => self.push(TokenKind::Colon, ":"),
                ';' => self.push(TokenKind::SemiColon, ";"),
                '(' => self.push(TokenKind::LParen, "("),
                ')' => self.push(TokenKind::RParen, ")"),
                '{' => self.push(TokenKind::LBrace, "{"),
                '}' => self.push(TokenKind::RBrace, "}"),
                '"' => self.read_string(),
                c if Self::is_letter(c) => self.read_identifier(idx),
                c if c.is_ascii_digit() => self.read_number(idx, c),
                _ => self.errs.push(LexError::InvalidCharacter(ch)),
            }
        }
        self.toks.push(Token::new(TokenKind::Eof, "\0"));
        (self.toks, self.errs)
    }

    fn read_identifier(&mut self, start: usize) {
        while self
            .iter
            .next_if(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '_')
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.src[start..end];
        match keywords(ident) {
            Some(kind) => self.toks.push(Token::new(kind, ident)),
            None => self.toks.push(Token::new(TokenKind::Ident, ident)),
        }
    }

    fn read_string(&mut self) {
        let mut literal = String::new();
        loop {
            match self.iter.next() {
                Some((_, '"')) => {
                    self.toks.push(Token::new(TokenKind::String, literal));
                    return;
                }
                Some((_, '\n')) | None => {
                    self.errs.push(LexError::UnterminatedString);
                    return;
                }
                Some((_, '\\')) => match self.iter.next() {
                    Some((_, 'n')) => literal.push('\n'),
                    Some((_, 't')) => literal.push('\t'),
                    Some((_, '\\')) => literal.push('\\'),
                    Some((_, '0')) => literal.push('\0'),
                    Some((_, '\n')) | None => {
                        self.errs.push(LexError::UnterminatedString);
                        return;
                    }
                    Some((_, other)) => {
                        self.errs.push(LexError::UnknownEscape(other));
                        literal.push(other);
                    }
                },
                Some((_, ch)) => literal.push(ch),
            }
        }
    }

    fn read_number(&mut self, start: usize, first: char) {
        if first == '0' {
            match self.peek_char() {
                'x' => {
                    self.iter.next();
                    return self.read_radix(start, "hex digit", |ch| ch.is_ascii_hexdigit(), TokenKind::Hex);
                }
                'o' => {
                    self.iter.next();
                    return self.read_radix(start, "octal digit", |ch| ('0'..='7').contains(&ch), TokenKind::Octal);
                }
                'b' => {
                    self.iter.next();
                    return self.read_radix(start, "binary digit", |ch| ch == '0' || ch == '1', TokenKind::Binary);
                }
                _ => {}
            }
        }

        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        if self.iter.next_if(|(_, ch)| *ch == '.').is_some() {
            // A dot only belongs to the literal when a digit follows.
            if !self.peek_char().is_ascii_digit() {
                let found = self.peek_char();
                self.errs.push(LexError::UnexpectedCharacter {
                    expected: "digit",
                    found,
                });
                return;
            }
            while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
            self.push_span(TokenKind::Float, start);
            return;
        }

        self.push_span(TokenKind::Int, start);
    }

    fn read_radix(
        &mut self,
        start: usize,
        expected: &'static str,
        digit: fn(char) -> bool,
        kind: TokenKind,
    ) {
        if self.iter.next_if(|(_, ch)| digit(*ch)).is_none() {
            let found = self.peek_char();
            self.errs.push(LexError::UnexpectedCharacter { expected, found });
            return;
        }
        while self.iter.next_if(|(_, ch)| digit(*ch)).is_some() {}
        self.push_span(kind, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let (toks, errs) = lex(input);
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
        toks.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_punctuation() {
        let output = kinds("=+(){},;.:%");

        assert_eq!(
            output,
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::SemiColon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let input = "var five = 5;
        var add = fn(x, y) {
            return x + y;
        };
        if five < 10 { true } else { false }
        null and or";

        let output = kinds(input);
        assert_eq!(
            output,
            vec![
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Function,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::SemiColon,
                TokenKind::RBrace,
                TokenKind::SemiColon,
                TokenKind::If,
                TokenKind::Ident,
                TokenKind::LessThan,
                TokenKind::Int,
                TokenKind::LBrace,
                TokenKind::True,
                TokenKind::RBrace,
                TokenKind::Else,
                TokenKind::LBrace,
                TokenKind::False,
                TokenKind::RBrace,
                TokenKind::Null,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        let output = kinds("10 == 10; 10 != 9; !true;");
        assert_eq!(
            output,
            vec![
                TokenKind::Int,
                TokenKind::Equal,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Int,
                TokenKind::NotEqual,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Bang,
                TokenKind::True,
                TokenKind::SemiColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comments() {
        let output = kinds("1; // the rest is skipped ;;;\n2;");
        assert_eq!(
            output,
            vec![
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let (toks, errs) = lex("42 4.25 0.5 0x1F 0o17 0b101 0");
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
        assert_eq!(
            toks,
            vec![
                Token::new(TokenKind::Int, "42"),
                Token::new(TokenKind::Float, "4.25"),
                Token::new(TokenKind::Float, "0.5"),
                Token::new(TokenKind::Hex, "0x1F"),
                Token::new(TokenKind::Octal, "0o17"),
                Token::new(TokenKind::Binary, "0b101"),
                Token::new(TokenKind::Int, "0"),
                Token::new(TokenKind::Eof, "\0"),
            ]
        );
    }

    #[test]
    fn test_number_errors() {
        let (toks, errs) = lex("0x; 1. 0b2");
        assert_eq!(
            errs,
            vec![
                LexError::UnexpectedCharacter {
                    expected: "hex digit",
                    found: ';'
                },
                LexError::UnexpectedCharacter {
                    expected: "digit",
                    found: ' '
                },
                LexError::UnexpectedCharacter {
                    expected: "binary digit",
                    found: '2'
                },
            ]
        );
        // The malformed literals are dropped but scanning continues.
        assert_eq!(
            toks.into_iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::SemiColon,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        let (toks, errs) = lex(r#""hello" "a\tb\n" "\\" "\0""#);
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
        assert_eq!(
            toks,
            vec![
                Token::new(TokenKind::String, "hello"),
                Token::new(TokenKind::String, "a\tb\n"),
                Token::new(TokenKind::String, "\\"),
                Token::new(TokenKind::String, "\0"),
                Token::new(TokenKind::Eof, "\0"),
            ]
        );
    }

    #[test]
    fn test_string_unknown_escape() {
        let (toks, errs) = lex(r#""a\qb""#);
        assert_eq!(errs, vec![LexError::UnknownEscape('q')]);
        assert_eq!(toks[0], Token::new(TokenKind::String, "aqb"));
    }

    #[test]
    fn test_string_unterminated() {
        let (toks, errs) = lex("\"abc\n1;");
        assert_eq!(errs, vec![LexError::UnterminatedString]);
        assert_eq!(
            toks.into_iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![TokenKind::Int, TokenKind::SemiColon, TokenKind::Eof]
        );

        let (_, errs) = lex("\"abc");
        assert_eq!(errs, vec![LexError::UnterminatedString]);
    }

    #[test]
    fn test_invalid_characters() {
        let (toks, errs) = lex("1 @ 2 #");
        assert_eq!(
            errs,
            vec![LexError::InvalidCharacter('@'), LexError::InvalidCharacter('#')]
        );
        assert_eq!(
            toks.into_iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![TokenKind::Int, TokenKind::Int, TokenKind::Eof]
        );
    }
}
