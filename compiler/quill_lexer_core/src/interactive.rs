//! Line-at-a-time interactive stream.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::{step_position, CharStream, StreamError};

/// Supplier of input lines for an [`InteractiveStream`].
pub trait LineSource {
    /// Read one line, showing `prompt` first. `Ok(None)` means input is closed.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads lines from stdin, printing the prompt to stdout.
#[derive(Default)]
pub struct StdinLineSource;

impl LineSource for StdinLineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Pre-recorded lines, for tests and for hosts feeding input programmatically.
///
/// Every prompt shown is recorded in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedLines {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        Ok(self.lines.pop_front())
    }
}

/// Stream that blocks for one more line whenever its buffer runs dry.
///
/// Blank lines are skipped. Input only ends when the [`LineSource`] reports
/// that it is closed, so a statement may span as many lines as it needs.
pub struct InteractiveStream<S: LineSource> {
    source: S,
    buffer: Vec<char>,
    index: usize,
    line: usize,
    pos: usize,
    exhausted: bool,
    past_end: bool,
    statement_start: bool,
    primary_prompt: String,
    continuation_prompt: String,
}

impl<S: LineSource> InteractiveStream<S> {
    pub fn new(source: S) -> Self {
        InteractiveStream {
            source,
            buffer: Vec::new(),
            index: 0,
            line: 1,
            pos: 1,
            exhausted: false,
            past_end: false,
            statement_start: true,
            primary_prompt: ">>> ".to_owned(),
            continuation_prompt: "... ".to_owned(),
        }
    }

    /// Replace the prompts shown at statement start and on continuation lines.
    #[must_use]
    pub fn with_prompts(mut self, primary: impl Into<String>, continuation: impl Into<String>) -> Self {
        self.primary_prompt = primary.into();
        self.continuation_prompt = continuation.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Pull lines until a non-blank one arrives. Returns false once input is closed.
    fn fill(&mut self) -> Result<bool, StreamError> {
        loop {
            let prompt = if self.statement_start {
                &self.primary_prompt
            } else {
                &self.continuation_prompt
            };

            let read = self.source.read_line(prompt).map_err(|e| StreamError::Input {
                line: self.line,
                message: e.to_string(),
            })?;

            let Some(text) = read else {
                self.exhausted = true;
                return Ok(false);
            };

            let text = text.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                self.line += 1;
                continue;
            }

            self.buffer.extend(text.chars());
            self.buffer.push('\n');
            self.statement_start = false;
            return Ok(true);
        }
    }
}

impl<S: LineSource> CharStream for InteractiveStream<S> {
    fn current_line(&self) -> usize {
        self.line
    }

    fn current_pos(&self) -> usize {
        self.pos
    }

    fn get_char(&mut self) -> Result<char, StreamError> {
        if self.index >= self.buffer.len() && (self.exhausted || !self.fill()?) {
            return Err(StreamError::Eof {
                line: self.line,
                pos: self.pos,
            });
        }
        Ok(self.buffer[self.index])
    }

    /// Advancing at the end of the buffer never blocks: a character that was
    /// never fetched cannot be skipped, so only a closed source moves the
    /// stream past EOF.
    fn next_char(&mut self) {
        if let Some(&c) = self.buffer.get(self.index) {
            step_position(c, &mut self.line, &mut self.pos);
            self.index += 1;
        } else if self.exhausted {
            self.past_end = true;
        }
    }

    fn at_eof(&self) -> bool {
        self.exhausted && self.index >= self.buffer.len()
    }

    fn after_eof(&self) -> bool {
        self.past_end
    }

    fn history(&self) -> String {
        self.buffer.iter().collect()
    }

    fn set_statement(&mut self) {
        self.buffer.drain(..self.index);
        self.index = 0;
        self.statement_start = self.buffer.iter().all(|c| c.is_whitespace());
        if self.statement_start {
            self.buffer.clear();
        }
    }

    fn next_line(&mut self) {
        let rest = &self.buffer[self.index..];
        match rest.iter().position(|&c| c == '\n') {
            Some(offset) => {
                self.buffer.drain(self.index..=self.index + offset);
                self.line += 1;
                self.pos = 1;
            }
            None => self.buffer.truncate(self.index),
        }
    }
}

#[cfg(test)]
mod tests;
