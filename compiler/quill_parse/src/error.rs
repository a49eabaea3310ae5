//! Parse errors.

use quill_lexer::{Token, TokenizeError, TokenizeErrorKind};
use thiserror::Error;

/// A positional parse failure.
///
/// `fatal` is false only for errors raised before the failing production
/// consumed any token; those let the caller try another production.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}, position {pos}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub pos: usize,
    pub fatal: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected { expected: &'static str, found: String },
    #[error("unexpected end of script, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("'}}' without a matching '{{'")]
    UnexpectedBlockClose,
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("{0}")]
    Tokenize(TokenizeErrorKind),
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, line: usize, pos: usize) -> Self {
        ParseError {
            kind,
            line,
            pos,
            fatal: true,
        }
    }

    /// Error for `found` where `expected` was required.
    #[cold]
    pub fn unexpected(expected: &'static str, found: &Token) -> Self {
        let kind = if found.is(quill_lexer::TokenKind::Eof) {
            ParseErrorKind::UnexpectedEof { expected }
        } else {
            ParseErrorKind::Expected {
                expected,
                found: found.to_string(),
            }
        };
        Self::new(kind, found.line, found.pos)
    }

    #[must_use]
    pub fn soft(mut self) -> Self {
        self.fatal = false;
        self
    }

    #[must_use]
    pub fn hard(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Whether the script simply ran out before the construct was complete.
    pub fn is_eof(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::UnexpectedEof { .. }
                | ParseErrorKind::Tokenize(TokenizeErrorKind::Eof { .. })
        )
    }
}

impl From<TokenizeError> for ParseError {
    fn from(error: TokenizeError) -> Self {
        ParseError::new(ParseErrorKind::Tokenize(error.kind), error.line, error.pos)
    }
}
