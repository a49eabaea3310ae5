//! Stream errors.

use thiserror::Error;

/// Failure to produce a character.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A character was requested at or after the end of input.
    #[error("unexpected end of input at line {line}, position {pos}")]
    Eof { line: usize, pos: usize },
    /// The underlying line source failed.
    #[error("failed to read input at line {line}: {message}")]
    Input { line: usize, message: String },
}

impl StreamError {
    /// Whether this error only signals end of input.
    pub fn is_eof(&self) -> bool {
        matches!(self, StreamError::Eof { .. })
    }
}
