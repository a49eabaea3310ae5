//! Fixed-string character stream.

use crate::{step_position, CharStream, StreamError};

/// Stream over a complete script held in memory.
#[derive(Clone, Debug)]
pub struct StringStream {
    chars: Vec<char>,
    index: usize,
    line: usize,
    pos: usize,
    past_end: bool,
}

impl StringStream {
    pub fn new(source: &str) -> Self {
        StringStream {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            pos: 1,
            past_end: false,
        }
    }

    /// Number of characters not yet consumed.
    pub fn remaining(&self) -> usize {
        self.chars.len().saturating_sub(self.index)
    }
}

impl CharStream for StringStream {
    fn current_line(&self) -> usize {
        self.line
    }

    fn current_pos(&self) -> usize {
        self.pos
    }

    fn get_char(&mut self) -> Result<char, StreamError> {
        self.chars.get(self.index).copied().ok_or(StreamError::Eof {
            line: self.line,
            pos: self.pos,
        })
    }

    fn next_char(&mut self) {
        match self.chars.get(self.index) {
            Some(&c) => {
                step_position(c, &mut self.line, &mut self.pos);
                self.index += 1;
            }
            None => self.past_end = true,
        }
    }

    fn at_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn after_eof(&self) -> bool {
        self.past_end
    }

    fn history(&self) -> String {
        self.chars[..self.index].iter().collect()
    }
}
