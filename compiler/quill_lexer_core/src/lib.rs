//! Character streams feeding the Quill tokenizer.
//!
//! A [`CharStream`] is a cursor over characters with line/position tracking
//! and an explicit end-of-input protocol:
//!
//! 1. While characters remain, [`CharStream::get_char`] returns the current one
//!    and [`CharStream::next_char`] advances.
//! 2. Once the buffered input is exhausted the stream sits *at* EOF. EOF is a
//!    real position: errors raised there still report a line and column.
//! 3. Advancing once more moves the stream *after* EOF, a terminal state.
//!
//! # Architecture
//!
//! - [`StringStream`]: a fixed source string; terminates after its buffer.
//! - [`InteractiveStream`]: pulls one more line from a [`LineSource`] whenever
//!   its buffer runs dry, blocking the caller. The same tokenizer and parser
//!   serve whole scripts and statement-at-a-time sessions.

mod error;
mod interactive;
mod string_stream;

pub use error::StreamError;
pub use interactive::{InteractiveStream, LineSource, ScriptedLines, StdinLineSource};
pub use string_stream::StringStream;

/// Character source consumed by the tokenizer.
///
/// Lines and positions are 1-based and always describe the character that
/// [`get_char`](CharStream::get_char) would return next.
pub trait CharStream {
    /// Line of the current character.
    fn current_line(&self) -> usize;

    /// Column of the current character within its line.
    fn current_pos(&self) -> usize;

    /// The current character, or [`StreamError::Eof`] when none is available.
    ///
    /// Interactive streams may block here to request more input.
    fn get_char(&mut self) -> Result<char, StreamError>;

    /// Advance past the current character.
    ///
    /// At EOF this moves the stream into the terminal after-EOF state.
    fn next_char(&mut self);

    /// True when every buffered character has been consumed and no more will arrive.
    fn at_eof(&self) -> bool;

    /// True once the stream has been advanced past its EOF position.
    fn after_eof(&self) -> bool;

    /// Text consumed or buffered so far, used as error context.
    fn history(&self) -> String;

    /// Mark the start of a new statement.
    ///
    /// Interactive streams drop already-consumed text and switch back to the
    /// primary prompt. Other streams ignore this.
    fn set_statement(&mut self) {}

    /// Discard the remainder of the current line.
    ///
    /// Used to resynchronize an interactive session after an error.
    fn next_line(&mut self) {}
}

/// Advance a line/position pair over `c`.
#[inline]
pub(crate) fn step_position(c: char, line: &mut usize, pos: &mut usize) {
    if c == '\n' {
        *line += 1;
        *pos = 1;
    } else {
        *pos += 1;
    }
}
