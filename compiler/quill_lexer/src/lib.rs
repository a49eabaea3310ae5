//! Tokenizer for the Quill scripting language.
//!
//! Turns a [`CharStream`] into [`Token`]s. Tokens are produced on demand, one
//! at a time, so an interactive stream is only asked for another line when the
//! parser actually needs the next token.
//!
//! # Lexical rules
//!
//! - Literal text runs end at whitespace or one of `; ( ) { } $ "`.
//! - `"…"` quoted strings support `\n`, `\t`, `\r` and pass any other escaped
//!   character through unchanged. Outside quotes `\` escapes one character.
//! - `$` starts an expansion; `^` directly after it marks a spread.
//! - `!` is a control sigil only where a statement may begin.
//! - Newlines and `;` separate commands, except that newlines inside `( )`
//!   are plain whitespace.
//! - `#` at the start of a token comments out the rest of the line.
//!
//! # Consume-rest
//!
//! [`ConsumeRestTriggers`] maps a command name to an argument index. When a
//! command call at statement position reaches that argument, the remainder of
//! the line is returned verbatim as a single [`TokenKind::StringLiteral`].

mod error;
mod token;
mod tokenizer;
mod tracker;

pub use error::{TokenizeError, TokenizeErrorKind};
pub use quill_lexer_core::{CharStream, StreamError, StringStream};
pub use token::{Token, TokenKind};
pub use tokenizer::{ConsumeRestTriggers, Tokenizer};

/// Tokenize a whole string, including the final [`TokenKind::Eof`] token.
pub fn tokenize(source: &str, triggers: &ConsumeRestTriggers) -> Result<Vec<Token>, TokenizeError> {
    let mut tokenizer = Tokenizer::with_triggers(StringStream::new(source), triggers.clone());
    tokenizer.tokenize_all()
}
