//! On-demand tokenizer over a [`CharStream`].

use quill_lexer_core::CharStream;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::tracker::CallTracker;
use crate::{Token, TokenKind, TokenizeError, TokenizeErrorKind};

/// Command name to argument index: from that argument on, the rest of the
/// line is taken verbatim as one argument.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsumeRestTriggers {
    triggers: FxHashMap<String, usize>,
}

impl ConsumeRestTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, call: impl Into<String>, index: usize) -> Self {
        self.insert(call, index);
        self
    }

    pub fn insert(&mut self, call: impl Into<String>, index: usize) {
        self.triggers.insert(call.into(), index);
    }

    pub fn get(&self, call: &str) -> Option<usize> {
        self.triggers.get(call).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Merge `other` into `self`, `other` winning on conflicts.
    pub fn extend(&mut self, other: &ConsumeRestTriggers) {
        for (call, index) in &other.triggers {
            self.triggers.insert(call.clone(), *index);
        }
    }
}

/// Produces tokens one at a time from a character stream.
pub struct Tokenizer<S: CharStream> {
    stream: S,
    triggers: ConsumeRestTriggers,
    tracker: CallTracker,
    peeked: Option<Token>,
    eof_emitted: bool,
    /// Whitespace was skipped before the token being read.
    spaced: bool,
}

impl<S: CharStream> Tokenizer<S> {
    pub fn new(stream: S) -> Self {
        Self::with_triggers(stream, ConsumeRestTriggers::default())
    }

    pub fn with_triggers(stream: S, triggers: ConsumeRestTriggers) -> Self {
        Tokenizer {
            stream,
            triggers,
            tracker: CallTracker::default(),
            peeked: None,
            eof_emitted: false,
            spaced: false,
        }
    }

    pub fn set_triggers(&mut self, triggers: ConsumeRestTriggers) {
        self.triggers = triggers;
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_stream(self) -> S {
        self.stream
    }

    /// Forget statement-level state and any peeked token, e.g. after
    /// resynchronizing an interactive session.
    pub fn reset(&mut self) {
        self.tracker = CallTracker::default();
        self.peeked = None;
    }

    /// Read tokens up to and including [`TokenKind::Eof`].
    pub fn tokenize_all(&mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produce the next token.
    ///
    /// After the single [`TokenKind::Eof`] token, every further call fails
    /// with a tokenize-EOF error.
    pub fn next_token(&mut self) -> Result<Token, TokenizeError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.read_next(),
        }
    }

    /// Look at the next token without consuming it.
    ///
    /// The peeked token survives across parser instances, so a statement-at-a-time
    /// driver never loses the lookahead of the previous statement.
    pub fn peek_token(&mut self) -> Result<&Token, TokenizeError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_next()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn read_next(&mut self) -> Result<Token, TokenizeError> {
        if self.eof_emitted || self.stream.after_eof() {
            return Err(self.error(TokenizeErrorKind::Eof {
                context: "after the last token",
            }));
        }

        self.skip_blank()?;
        let (line, pos) = (self.stream.current_line(), self.stream.current_pos());

        let token = match self.consume_rest(line, pos)? {
            Some(token) => token,
            None => self.read_token(line, pos)?,
        };

        trace!(kind = ?token.kind, value = %token.value, line, pos, "token");
        self.tracker.observe(token.kind, &token.value);
        Ok(token)
    }

    fn read_token(&mut self, line: usize, pos: usize) -> Result<Token, TokenizeError> {
        let c = match self.stream.get_char() {
            Ok(c) => c,
            Err(e) if e.is_eof() => {
                self.stream.next_char();
                self.eof_emitted = true;
                return Ok(Token::new(TokenKind::Eof, "", line, pos));
            }
            Err(e) => return Err(TokenizeError::from_stream(e, "")),
        };

        let single = |kind: TokenKind| Token::new(kind, c, line, pos);
        let token = match c {
            '\n' | ';' => single(TokenKind::CommandSep),
            '(' => single(TokenKind::OpenArgs),
            ')' => single(TokenKind::CloseArgs),
            '{' => single(TokenKind::OpenBlock),
            '}' => single(TokenKind::CloseBlock),
            '$' => single(TokenKind::ExpansionSigil),
            '^' if !self.spaced && self.tracker.last() == Some(TokenKind::ExpansionSigil) => {
                single(TokenKind::SpreadSigil)
            }
            '!' if self.tracker.control_allowed() => single(TokenKind::ControlSigil),
            '"' => {
                self.stream.next_char();
                return self.read_quoted(line, pos);
            }
            c if is_forbidden(c) => {
                return Err(self.error(TokenizeErrorKind::Malformed {
                    message: format!("invalid character {c:?} in script"),
                }));
            }
            _ => return self.read_literal(line, pos),
        };
        self.stream.next_char();
        Ok(token)
    }

    /// Skip spaces, tabs, comments, and newlines nested inside parentheses.
    fn skip_blank(&mut self) -> Result<(), TokenizeError> {
        self.spaced = false;
        loop {
            match self.stream.get_char() {
                Ok(' ' | '\t' | '\r') => {}
                Ok('\n') if self.tracker.depth() > 0 => {}
                Ok('#') => {
                    self.skip_comment()?;
                    continue;
                }
                Ok(_) => return Ok(()),
                Err(e) if e.is_eof() => return Ok(()),
                Err(e) => return Err(TokenizeError::from_stream(e, "")),
            }
            self.spaced = true;
            self.stream.next_char();
        }
    }

    /// Consume a comment up to, but not including, the end of the line.
    fn skip_comment(&mut self) -> Result<(), TokenizeError> {
        loop {
            match self.stream.get_char() {
                Ok('\n') => return Ok(()),
                Ok(_) => self.stream.next_char(),
                Err(e) if e.is_eof() => return Ok(()),
                Err(e) => return Err(TokenizeError::from_stream(e, "")),
            }
        }
    }

    /// If the current command has reached its consume-rest argument, take the
    /// rest of the line verbatim.
    fn consume_rest(&mut self, line: usize, pos: usize) -> Result<Option<Token>, TokenizeError> {
        let Some((call, index)) = self.tracker.pending_argument() else {
            return Ok(None);
        };
        if self.triggers.get(call) != Some(index) {
            return Ok(None);
        }

        match self.stream.get_char() {
            Ok('\n' | ';' | '}') => return Ok(None),
            Ok(_) => {}
            Err(e) if e.is_eof() => return Ok(None),
            Err(e) => return Err(TokenizeError::from_stream(e, "")),
        }

        let mut text = String::new();
        loop {
            match self.stream.get_char() {
                Ok('\n') => break,
                Ok(c) => {
                    text.push(c);
                    self.stream.next_char();
                }
                Err(e) if e.is_eof() => break,
                Err(e) => return Err(TokenizeError::from_stream(e, "")),
            }
        }
        text.truncate(text.trim_end().len());
        Ok(Some(Token::new(TokenKind::StringLiteral, text, line, pos)))
    }

    fn read_quoted(&mut self, line: usize, pos: usize) -> Result<Token, TokenizeError> {
        let mut text = String::new();
        loop {
            let c = self
                .stream
                .get_char()
                .map_err(|e| TokenizeError::from_stream(e, "inside quoted string"))?;
            self.stream.next_char();
            match c {
                '"' => return Ok(Token::new(TokenKind::StringLiteral, text, line, pos)),
                '\\' => text.push(self.read_escape(true)?),
                c => text.push(c),
            }
        }
    }

    fn read_literal(&mut self, line: usize, pos: usize) -> Result<Token, TokenizeError> {
        let mut text = String::new();
        loop {
            let c = match self.stream.get_char() {
                Ok(c) if ends_literal(c) => break,
                Ok(c) if is_forbidden(c) => {
                    return Err(self.error(TokenizeErrorKind::Malformed {
                        message: format!("invalid character {c:?} in script"),
                    }));
                }
                Ok(c) => c,
                Err(e) if e.is_eof() => break,
                Err(e) => return Err(TokenizeError::from_stream(e, "")),
            };
            self.stream.next_char();
            if c == '\\' {
                text.push(self.read_escape(false)?);
            } else {
                text.push(c);
            }
        }
        Ok(Token::new(TokenKind::StringLiteral, text, line, pos))
    }

    /// Read the character after a backslash. Only quoted strings know the
    /// `\n`, `\t` and `\r` control escapes; elsewhere the character is taken
    /// as is.
    fn read_escape(&mut self, quoted: bool) -> Result<char, TokenizeError> {
        let c = self
            .stream
            .get_char()
            .map_err(|e| TokenizeError::from_stream(e, "after escape character"))?;
        self.stream.next_char();
        Ok(match c {
            'n' if quoted => '\n',
            't' if quoted => '\t',
            'r' if quoted => '\r',
            other => other,
        })
    }

    fn error(&self, kind: TokenizeErrorKind) -> TokenizeError {
        TokenizeError {
            kind,
            line: self.stream.current_line(),
            pos: self.stream.current_pos(),
        }
    }
}

/// Characters that end an unquoted literal run.
fn ends_literal(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | ';' | '(' | ')' | '{' | '}' | '$' | '"'
    )
}

/// Control characters other than the whitespace the grammar uses.
fn is_forbidden(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\r' | '\n')
}
