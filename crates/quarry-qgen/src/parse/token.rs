//! Tokenizer for the declarative query DSL.

use quarry_query_schema::Span;
use rust_decimal::Decimal;
use std::fmt;

use crate::decimal::parse_exact;
use crate::{QError, QErrorKind};

/// What a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    String,
    Number(Decimal),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Number(_) => write!(f, "number"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token and where it came from.
///
/// `text` is the identifier name, the unescaped string content, or the
/// number as written. It is empty for punctuation and end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

/// Single-pass scanner with one character of lookahead.
///
/// Once the end of input is reached, every further call returns another
/// [`TokenKind::Eof`] token.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos - start)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    pub fn next_token(&mut self) -> Result<Token, QError> {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: Span::new(start, 0),
            });
        };

        let punct = match c {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = punct {
            self.bump();
            return Ok(Token {
                kind,
                text: String::new(),
                span: self.span_from(start),
            });
        }

        if c == '"' {
            return self.string(start);
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.ident(start));
        }
        if c.is_ascii_digit() || c == '-' {
            return self.number(start);
        }

        self.bump();
        Err(QError::spanned(
            QErrorKind::UnexpectedChar { ch: c },
            self.span_from(start),
        ))
    }

    fn ident(&mut self, start: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        Token {
            kind: TokenKind::Ident,
            text: self.source[start..self.pos].to_string(),
            span: self.span_from(start),
        }
    }

    fn string(&mut self, start: usize) -> Result<Token, QError> {
        // opening quote
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => {
                        return Err(QError::spanned(
                            QErrorKind::UnterminatedString,
                            self.span_from(start),
                        ));
                    }
                },
                Some(c) => text.push(c),
                None => {
                    return Err(QError::spanned(
                        QErrorKind::UnterminatedString,
                        self.span_from(start),
                    ));
                }
            }
        }
        Ok(Token {
            kind: TokenKind::String,
            text,
            span: self.span_from(start),
        })
    }

    fn number(&mut self, start: usize) -> Result<Token, QError> {
        // leading digit or minus sign
        self.bump();
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        let text = &self.source[start..self.pos];
        let span = self.span_from(start);
        let value = parse_exact(text).ok_or_else(|| {
            QError::spanned(
                QErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                span,
            )
        })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            text: text.to_string(),
            span,
        })
    }
}
