//! Tokenizer errors.

use quill_lexer_core::StreamError;
use thiserror::Error;

/// A positional tokenizer failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}, position {pos}: {kind}")]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub line: usize,
    pub pos: usize,
}

/// What went wrong while tokenizing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenizeErrorKind {
    /// Input ended in the middle of a token, or a token was requested after EOF.
    #[error("unexpected end of script {context}")]
    Eof { context: &'static str },
    /// Any other malformed input.
    #[error("{message}")]
    Malformed { message: String },
    /// The character source itself failed.
    #[error("{message}")]
    Input { message: String },
}

impl TokenizeError {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenizeErrorKind::Eof { .. })
    }

    pub(crate) fn from_stream(error: StreamError, context: &'static str) -> Self {
        match error {
            StreamError::Eof { line, pos } => TokenizeError {
                kind: TokenizeErrorKind::Eof { context },
                line,
                pos,
            },
            StreamError::Input { line, message } => TokenizeError {
                kind: TokenizeErrorKind::Input { message },
                line,
                pos: 1,
            },
        }
    }
}
