//! Tree-walking interpreter.
//!
//! Evaluation is a recursive walk over the AST:
//!
//! | Node | Evaluation |
//! |------|------------|
//! | `ROOT`, `BLOCK` | each child statement in order |
//! | `COMMAND_CALL`, `CONTROL_CALL`, `EXPANSION_CALL` | [`Interpreter::interpret_call`] |
//! | `EXPANSION_VAR` | variable lookup, name possibly expanded |
//! | `EXPANSION` | the wrapped node, split on whitespace when spread |
//! | `STRING` | the literal text |
//!
//! `stop` and `return` travel up as [`Flow`] values rather than errors. Each
//! completed statement is counted against the statement limit; each call is
//! checked against the call-depth limit before its frame is pushed.

mod builder;

pub use builder::InterpreterBuilder;

use std::rc::Rc;

use quill_ir::{NodeKind, NodeRef};
use quill_lexer::{ConsumeRestTriggers, Tokenizer};
use quill_lexer_core::{CharStream, InteractiveStream, LineSource};
use quill_parse::{ParseError, Parser};
use quill_stack::ensure_sufficient_stack;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use crate::errors::{CallKind, EvalError, EvalErrorKind, EvalResult, ScriptError};
use crate::handler::{
    CallHandlerContainer, ExpansionAsCommand, Initializer, SharedContainer, SharedHandler,
};
use crate::{proceed, ArgSourceMap, CallContext, Flow, InterpreterContext};

/// Default ceiling on nested calls.
pub const DEFAULT_CALL_DEPTH_LIMIT: usize = 200;

/// Strings produced by one name or argument node.
pub type Words = SmallVec<[String; 1]>;

/// Host callback for errors raised during an interactive session.
pub type ErrorCallback<'a> = &'a mut dyn FnMut(&ScriptError);

/// A configured interpreter. Holds no per-run state; see [`InterpreterContext`].
pub struct Interpreter {
    commands: SharedContainer<()>,
    controls: SharedContainer<()>,
    expansions: SharedContainer<String>,
    initializers: Vec<Box<dyn Initializer>>,
    context_factory: Box<dyn Fn() -> InterpreterContext>,
    triggers: ConsumeRestTriggers,
    statement_limit: usize,
    call_depth_limit: usize,
    max_nesting: usize,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn statement_limit(&self) -> usize {
        self.statement_limit
    }

    pub fn call_depth_limit(&self) -> usize {
        self.call_depth_limit
    }

    pub fn consume_rest_triggers(&self) -> &ConsumeRestTriggers {
        &self.triggers
    }

    /// A fresh context from the configured factory.
    pub fn new_context(&self) -> InterpreterContext {
        (self.context_factory)()
    }

    /// Whether `ctx` has executed more statements than allowed.
    pub fn over_statement_limit(&self, ctx: &InterpreterContext) -> bool {
        self.statement_limit != 0 && ctx.statement_count() > self.statement_limit
    }

    /// Whether pushing one more call onto `ctx` would exceed the depth limit.
    pub fn over_call_depth_limit(&self, ctx: &InterpreterContext) -> bool {
        self.call_depth_limit != 0 && ctx.call_depth() >= self.call_depth_limit
    }

    /// Bind `ctx` to this interpreter: reset its call stack, layer the
    /// built-in handlers behind its runtime calls and run the initializers.
    pub fn init_context(&self, ctx: &mut InterpreterContext) -> EvalResult<()> {
        ctx.set_base_call();
        ctx.bind_handlers(
            SharedContainer::clone(&self.commands),
            SharedContainer::clone(&self.controls),
            SharedContainer::clone(&self.expansions),
        );
        for init in &self.initializers {
            init.initialize(ctx)?;
        }
        Ok(())
    }

    // --- entry points ---

    /// Parse `script` with this interpreter's nesting limit and triggers plus `triggers`.
    pub fn parse(&self, script: &str, triggers: &ConsumeRestTriggers) -> Result<NodeRef, ParseError> {
        let mut all = self.triggers.clone();
        all.extend(triggers);
        quill_parse::parse_script_with(script, &all, self.max_nesting)
    }

    /// Parse and run a whole script in `ctx`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(
        &self,
        script: &str,
        ctx: &mut InterpreterContext,
        triggers: &ConsumeRestTriggers,
    ) -> Result<(), ScriptError> {
        let root = self.parse(script, triggers)?;
        self.interpret_ast(&root, ctx)
    }

    /// Run a script in a new context and return the context.
    pub fn run_fresh(&self, script: &str) -> Result<InterpreterContext, ScriptError> {
        let mut ctx = self.new_context();
        self.run(script, &mut ctx, &ConsumeRestTriggers::new())?;
        Ok(ctx)
    }

    /// Parse and run exactly one statement in `ctx`, keeping its variables
    /// and definitions. An unbound context is initialized first.
    pub fn run_statement(&self, statement: &str, ctx: &mut InterpreterContext) -> Result<(), ScriptError> {
        let mut tokens = Tokenizer::with_triggers(quill_lexer::StringStream::new(statement), self.triggers.clone());
        let mut parser = Parser::new(&mut tokens).with_max_nesting(self.max_nesting);
        let Some(node) = parser.parse_statement()? else {
            return Ok(());
        };
        parser.expect_end()?;

        if !ctx.is_bound() {
            self.init_context(ctx)?;
        }
        match self.interpret_statement(ctx, &node)? {
            Flow::Continue(()) | Flow::Stop => Ok(()),
            Flow::Return(_) => Err(ctx.error(EvalErrorKind::ReturnOutsideFunction).into()),
        }
    }

    /// Run an already parsed tree in `ctx`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn interpret_ast(&self, root: &NodeRef, ctx: &mut InterpreterContext) -> Result<(), ScriptError> {
        self.init_context(ctx)?;
        match self.interpret_root(ctx, root)? {
            Flow::Continue(()) => Ok(()),
            Flow::Stop => {
                debug!("script stopped");
                Ok(())
            }
            Flow::Return(_) => Err(ctx.error(EvalErrorKind::ReturnOutsideFunction).into()),
        }
    }

    /// Interactive session: read, parse and run one statement at a time.
    ///
    /// `prelude` runs first in the session's context. Without `on_error` the
    /// first error ends the session; with it, the error is reported and the
    /// session resumes on the next line. Returns the session context once
    /// input closes or a script calls `stop`.
    pub fn repl<S: LineSource>(
        &self,
        stream: InteractiveStream<S>,
        mut on_error: Option<ErrorCallback<'_>>,
        prelude: Option<&str>,
    ) -> Result<InterpreterContext, ScriptError> {
        let mut ctx = self.new_context();
        match prelude {
            Some(prelude) => {
                debug!("repl: running prelude");
                self.run(prelude, &mut ctx, &ConsumeRestTriggers::new())?;
            }
            None => self.init_context(&mut ctx)?,
        }

        let mut tokens = Tokenizer::with_triggers(stream, self.triggers.clone());
        loop {
            let parsed = Parser::new(&mut tokens)
                .with_max_nesting(self.max_nesting)
                .parse_statement();
            tokens.stream_mut().set_statement();

            let outcome = match parsed {
                Ok(None) => break,
                Ok(Some(node)) => self.interpret_statement(&mut ctx, &node).map_err(ScriptError::from),
                Err(error) => Err(error.into()),
            };
            let error = match outcome {
                Ok(Flow::Continue(())) => continue,
                Ok(Flow::Stop) => break,
                Ok(Flow::Return(_)) => ctx.error(EvalErrorKind::ReturnOutsideFunction).into(),
                Err(error) => error,
            };

            let Some(callback) = on_error.as_deref_mut() else {
                return Err(error);
            };
            callback(&error);
            if matches!(&error, ScriptError::Parse(parse) if parse.is_eof()) {
                break;
            }
            tokens.reset();
            tokens.stream_mut().set_statement();
            tokens.stream_mut().next_line();
        }
        Ok(ctx)
    }

    /// Indented dump of the tree `script` parses to.
    pub fn test_parse(script: &str, triggers: &ConsumeRestTriggers) -> Result<String, ParseError> {
        Ok(quill_parse::parse_script(script, triggers)?.dump())
    }

    // --- evaluation ---

    pub fn interpret_root(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow> {
        ctx.set_current_node(node);
        for statement in node.children() {
            proceed!(self.interpret_statement(ctx, statement)?);
        }
        Ok(Flow::CONTINUE)
    }

    /// Run one statement and count it. Controls call this to run their body.
    pub fn interpret_statement(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow> {
        ctx.set_current_node(node);
        let flow = ensure_sufficient_stack(|| match node.kind() {
            NodeKind::CommandCall => self.interpret_command(ctx, node),
            NodeKind::ControlCall => self.interpret_control(ctx, node),
            NodeKind::Block => self.interpret_block(ctx, node),
            other => Err(ctx.raise(EvalError::internal(format!("bad statement type {other}")))),
        })?;

        if flow.is_continue() {
            let count = ctx.count_statement();
            if self.statement_limit != 0 && count > self.statement_limit {
                return Err(ctx.error(EvalErrorKind::StatementLimit {
                    limit: self.statement_limit,
                }));
            }
        }
        Ok(flow)
    }

    pub fn interpret_block(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow> {
        ctx.set_current_node(node);
        for statement in node.children() {
            proceed!(self.interpret_statement(ctx, statement)?);
        }
        Ok(Flow::CONTINUE)
    }

    pub fn interpret_command(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow> {
        self.interpret_call(ctx, node, CallKind::Command, |ctx, name| {
            ctx.commands().get_for_call(name).or_else(|| {
                if !ctx.unified_commands() {
                    return None;
                }
                let expansion = ctx.expansions().get_for_call(name)?;
                trace!(call = name, "expansion called as a command");
                Some(Rc::new(ExpansionAsCommand::new(expansion)) as SharedHandler<()>)
            })
        })
    }

    pub fn interpret_control(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow> {
        self.interpret_call(ctx, node, CallKind::Control, |ctx, name| {
            ctx.controls().get_for_call(name)
        })
    }

    pub fn interpret_expansion_call(
        &self,
        ctx: &mut InterpreterContext,
        node: &NodeRef,
    ) -> EvalResult<Flow<String>> {
        self.interpret_call(ctx, node, CallKind::Expansion, |ctx, name| {
            ctx.expansions().get_for_call(name)
        })
    }

    /// The unified call algorithm shared by commands, controls and expansions.
    ///
    /// Name and arguments are expanded left to right into one flat list, the
    /// first word naming the call. The frame is pushed after the depth check
    /// and popped whatever the handler returns.
    pub fn interpret_call<T>(
        &self,
        ctx: &mut InterpreterContext,
        node: &NodeRef,
        kind: CallKind,
        lookup: impl FnOnce(&InterpreterContext, &str) -> Option<SharedHandler<T>>,
    ) -> EvalResult<Flow<T>> {
        let (Some(name_node), Some(args_node)) = (node.call_name(), node.call_args()) else {
            return Err(ctx.raise(EvalError::internal(format!("malformed {} node", node.kind()))));
        };

        let mut words = proceed!(self.interpret_string_or_expansion(ctx, name_node)?).into_iter();
        let name = match words.next() {
            Some(name) if !name.is_empty() => name,
            _ => {
                ctx.set_current_node(name_node);
                return Err(ctx.error(EvalErrorKind::EmptyCallName));
            }
        };
        let mut args: Vec<String> = words.collect();
        let mut arg_nodes = ArgSourceMap::new();
        arg_nodes.add_args(args.len(), name_node);

        for arg_node in args_node.children() {
            let produced = proceed!(self.interpret_string_or_expansion(ctx, arg_node)?);
            arg_nodes.add_args(produced.len(), arg_node);
            args.extend(produced);
        }

        ctx.set_current_node(node);
        if self.over_call_depth_limit(ctx) {
            return Err(ctx.error(EvalErrorKind::CallDepth {
                limit: self.call_depth_limit,
            }));
        }

        trace!(%kind, call = %name, ?args, "call");
        let control_node = match kind {
            CallKind::Control => node.control_node().cloned(),
            CallKind::Command | CallKind::Expansion => None,
        };
        ctx.push_call(CallContext::new(name, args, arg_nodes, control_node));

        let result = match lookup(&*ctx, ctx.call_name()) {
            Some(handler) => handler.handle_call(self, ctx),
            None => {
                ctx.set_current_node(name_node);
                Err(ctx.error(EvalErrorKind::MissingCall {
                    kind,
                    name: ctx.call_name().to_owned(),
                }))
            }
        };
        ctx.pop_call();
        result
    }

    /// Read a variable whose name may itself be expanded.
    pub fn interpret_variable_reference(
        &self,
        ctx: &mut InterpreterContext,
        node: &NodeRef,
    ) -> EvalResult<Flow<String>> {
        ctx.set_current_node(node);
        let Some(name_node) = node.child(0) else {
            return Err(ctx.raise(EvalError::internal("variable reference without a name")));
        };
        let name = proceed!(self.interpret_string_or_expansion(ctx, name_node)?).join(" ");

        ctx.set_current_node(node);
        match ctx.get_var(&name) {
            Some(value) => Ok(Flow::Continue(value.to_owned())),
            None => Err(ctx.error(EvalErrorKind::UndefinedVariable { name })),
        }
    }

    pub fn interpret_expansion(&self, ctx: &mut InterpreterContext, node: &NodeRef) -> EvalResult<Flow<Words>> {
        ctx.set_current_node(node);
        let Some(target) = node.expansion_target() else {
            return Err(ctx.raise(EvalError::internal("expansion without a target")));
        };
        let spread = node.is_spread();

        let value = ensure_sufficient_stack(|| match target.kind() {
            NodeKind::ExpansionVar => self.interpret_variable_reference(ctx, target),
            NodeKind::ExpansionCall => self.interpret_expansion_call(ctx, target),
            other => Err(ctx.raise(EvalError::internal(format!("bad expansion type {other}")))),
        })?;
        let value = proceed!(value);

        Ok(Flow::Continue(if spread {
            value.split_whitespace().map(str::to_owned).collect()
        } else {
            smallvec![value]
        }))
    }

    /// Evaluate a call name or argument node to the words it produces.
    pub fn interpret_string_or_expansion(
        &self,
        ctx: &mut InterpreterContext,
        node: &NodeRef,
    ) -> EvalResult<Flow<Words>> {
        ctx.set_current_node(node);
        match node.kind() {
            NodeKind::String => Ok(Flow::Continue(smallvec![node.text().to_owned()])),
            NodeKind::Expansion => self.interpret_expansion(ctx, node),
            other => Err(ctx.raise(EvalError::internal(format!("bad name or argument type {other}")))),
        }
    }
}
