//! Token types.

use std::fmt;

/// Lexical category of a [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Literal text, quoted or not. The token value is the unescaped text.
    StringLiteral,
    /// Newline or `;`.
    CommandSep,
    /// `(`
    OpenArgs,
    /// `)`
    CloseArgs,
    /// `{`
    OpenBlock,
    /// `}`
    CloseBlock,
    /// `$`
    ExpansionSigil,
    /// `^` directly after `$`.
    SpreadSigil,
    /// `!` at statement position.
    ControlSigil,
    /// End of input. Emitted exactly once.
    Eof,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::StringLiteral => "text",
            TokenKind::CommandSep => "end of command",
            TokenKind::OpenArgs => "'('",
            TokenKind::CloseArgs => "')'",
            TokenKind::OpenBlock => "'{'",
            TokenKind::CloseBlock => "'}'",
            TokenKind::ExpansionSigil => "'$'",
            TokenKind::SpreadSigil => "'^'",
            TokenKind::ControlSigil => "'!'",
            TokenKind::Eof => "end of script",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token and where it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, pos: usize) -> Self {
        Token {
            kind,
            value: value.into(),
            line,
            pos,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::StringLiteral => write!(f, "{:?}", self.value),
            TokenKind::CommandSep if self.value == "\n" => f.write_str("newline"),
            TokenKind::CommandSep => f.write_str("';'"),
            kind => kind.fmt(f),
        }
    }
}
