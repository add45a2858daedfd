//! Recursive-descent parser for the RPAL grammar.
//!
//! [`parse`] consumes the token vector produced by the lexer and returns the
//! n-ary parse tree. One function per grammar production lives in
//! [`grammar`]; this module owns the token cursor and the error type.

mod grammar;

use std::fmt;

use crate::ast::Expr;
use crate::lexer::{Keyword, Position, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Description of the token actually found.
    pub found: String,
    /// Description of what the grammar expected instead.
    pub expected: String,
    pub position: Position,
}

impl SyntaxError {
    pub fn new(found: impl Into<String>, expected: impl Into<String>, position: Position) -> Self {
        Self {
            found: found.into(),
            expected: expected.into(),
            position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SyntaxError: unexpected {}, expected {} at {}",
            self.found, self.expected, self.position
        )
    }
}

impl std::error::Error for SyntaxError {}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Token cursor over the lexer output.
///
/// The token vector always ends with an `Eof` sentinel; the cursor never
/// advances past it.
pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream always ends with Eof")
        })
    }

    /// The token after the current one, for the one-token lookahead in `Db`.
    pub fn peek_second(&self) -> &Token {
        self.tokens.get(self.index + 1).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream always ends with Eof")
        })
    }

    pub fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if !matches!(token, Token::Eof(_)) {
            self.index += 1;
        }
        token
    }

    pub fn at_keyword(&self, word: Keyword) -> bool {
        matches!(self.peek(), Token::Keyword(k) if k.word == word)
    }

    pub fn at_operator(&self, lexeme: &str) -> bool {
        matches!(self.peek(), Token::Operator(o) if o.lexeme == lexeme)
    }

    pub fn at_punct(&self, mark: char) -> bool {
        matches!(self.peek(), Token::Punct(p) if p.mark == mark)
    }

    pub fn expect_keyword(&mut self, word: Keyword) -> ParseResult<Position> {
        if self.at_keyword(word) {
            Ok(self.next().pos())
        } else {
            Err(self.error_expected(&format!("'{}'", word.as_str())))
        }
    }

    pub fn expect_operator(&mut self, lexeme: &str) -> ParseResult<Position> {
        if self.at_operator(lexeme) {
            Ok(self.next().pos())
        } else {
            Err(self.error_expected(&format!("'{}'", lexeme)))
        }
    }

    pub fn expect_punct(&mut self, mark: char) -> ParseResult<Position> {
        if self.at_punct(mark) {
            Ok(self.next().pos())
        } else {
            Err(self.error_expected(&format!("'{}'", mark)))
        }
    }

    pub fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Token::Identifier(_) => match self.next() {
                Token::Identifier(id) => Ok(id.value),
                _ => unreachable!(),
            },
            _ => Err(self.error_expected("an identifier")),
        }
    }

    /// Build a [`SyntaxError`] describing the current token.
    pub fn error_expected(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(token.describe(), expected, token.pos())
    }
}

/// Parse a full RPAL program; the whole token stream must be consumed.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, SyntaxError> {
    let mut state = ParseState::new(tokens);
    let expr = grammar::expression(&mut state)?;
    match state.peek() {
        Token::Eof(_) => Ok(expr),
        _ => Err(state.error_expected("end of input")),
    }
}
