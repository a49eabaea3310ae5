//! Quill Eval - interpreter for the Quill scripting language.
//!
//! # Architecture
//!
//! - [`Interpreter`]: immutable configuration (handler sets, limits, parser
//!   options) built with [`InterpreterBuilder`].
//! - [`InterpreterContext`]: the state of one run. Call stack, variables,
//!   statement counter, runtime-defined calls, handler-owned resources.
//! - [`CallHandler`] / [`CallHandlerContainer`]: the extension interface.
//!   Every command, control and expansion, including the standard ones, is
//!   a handler found by name at call time.
//! - [`ScopedVarStore`]: variable scopes with `nonlocal`/`global` resolution.
//! - [`Flow`]: `stop` and `return` as values instead of errors.
//!
//! The core defines no commands of its own; `quill_std` supplies the
//! standard set.

pub mod errors;
mod call_context;
mod context;
mod flow;
pub mod handler;
mod interpreter;
mod runtime;
mod vars;

pub use call_context::{ArgSourceMap, CallContext};
pub use context::{InterpreterContext, ScopedContext, MAIN_CALL};
pub use errors::{Backtrace, CallKind, EvalError, EvalErrorKind, EvalResult, ScriptError};
pub use flow::Flow;
pub use handler::{
    BaseCallHandlerContainer, CallHandler, CallHandlerContainer, CallbackCallHandler,
    ChoiceCallHandlerContainer, ExpansionAsCommand, Initializer, SharedContainer, SharedHandler,
    UnifiedObserver,
};
pub use interpreter::{
    ErrorCallback, Interpreter, InterpreterBuilder, Words, DEFAULT_CALL_DEPTH_LIMIT,
};
pub use runtime::{ReturnValue, RuntimeCall, RuntimeCallHandler};
pub use vars::{ScopedVarStore, VarScope};

pub use quill_ir::{AstNode, NodeKind, NodeRef, SourcePos};
pub use quill_lexer::ConsumeRestTriggers;
pub use quill_lexer_core::{InteractiveStream, LineSource, ScriptedLines, StdinLineSource};
pub use quill_parse::{ParseError, ParseErrorKind};
