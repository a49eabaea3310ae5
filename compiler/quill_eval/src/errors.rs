//! Interpreter errors.
//!
//! Every [`EvalError`] carries the position of the node being evaluated and a
//! snapshot of the call stack taken where the error was raised, so a backtrace
//! can be printed after the stack itself has unwound.

use std::fmt;

use quill_ir::SourcePos;
use quill_parse::ParseError;
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// The namespace a call is resolved in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    Command,
    Control,
    Expansion,
}

impl CallKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Command => "command",
            CallKind::Control => "control",
            CallKind::Expansion => "expansion",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("{kind} \"{name}\" not found")]
    MissingCall { kind: CallKind, name: String },
    #[error("no such variable \"{name}\"")]
    UndefinedVariable { name: String },
    #[error("exceeded maximum statement limit of {limit}")]
    StatementLimit { limit: usize },
    #[error("maximum call stack depth ({limit}) exceeded")]
    CallDepth { limit: usize },
    #[error("returning only allowed in functions")]
    ReturnOutsideFunction,
    #[error("call name must not expand to an empty string")]
    EmptyCallName,
    #[error("{message}")]
    Handler { message: String },
    #[error("internal interpreter error: {message}")]
    Internal { message: String },
}

/// One captured call frame: flags column and quoted name plus arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub flags: String,
    pub call: String,
}

/// Call stack snapshot, outermost frame first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Backtrace {
    frames: Vec<BacktraceFrame>,
}

impl Backtrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Backtrace { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

const ID_TITLE: &str = "ID";

/// Table with an `ID FLAGS NAME+ARGS` banner, one row per frame.
impl fmt::Display for Backtrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_id = self.frames.len().saturating_sub(1);
        let id_size = last_id.to_string().len().max(ID_TITLE.len());
        writeln!(f, "{ID_TITLE:<id_size$} {:<5} NAME+ARGS", "FLAGS")?;
        for (id, frame) in self.frames.iter().enumerate() {
            writeln!(f, "{id:<id_size$} {:<5} {}", frame.flags, frame.call)?;
        }
        Ok(())
    }
}

/// A runtime failure with its position and call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub pos: Option<SourcePos>,
    pub backtrace: Backtrace,
}

impl EvalError {
    #[cold]
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            pos: None,
            backtrace: Backtrace::default(),
        }
    }

    /// Error raised by a handler with a free-form message.
    #[cold]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Handler {
            message: message.into(),
        })
    }

    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Internal {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn at(mut self, pos: SourcePos) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// The message followed by the backtrace table.
    pub fn report(&self) -> String {
        if self.backtrace.is_empty() {
            return self.to_string();
        }
        format!("{self}\n{}", self.backtrace)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{pos}: {}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for EvalError {}

/// Failure of a whole-script entry point.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl ScriptError {
    /// Line and column of the failure, when known.
    pub fn pos(&self) -> Option<SourcePos> {
        match self {
            ScriptError::Parse(e) => Some(SourcePos::new(e.line, e.pos)),
            ScriptError::Eval(e) => e.pos,
        }
    }

    pub fn report(&self) -> String {
        match self {
            ScriptError::Parse(e) => e.to_string(),
            ScriptError::Eval(e) => e.report(),
        }
    }
}
