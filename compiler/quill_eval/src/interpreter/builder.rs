//! `InterpreterBuilder` for assembling an [`Interpreter`] from handler sets and limits.

use std::rc::Rc;

use quill_lexer::ConsumeRestTriggers;
use quill_parse::DEFAULT_MAX_NESTING;

use super::{Interpreter, DEFAULT_CALL_DEPTH_LIMIT};
use crate::handler::{
    BaseCallHandlerContainer, CallHandler, ChoiceCallHandlerContainer, Initializer,
    SharedContainer,
};
use crate::InterpreterContext;

/// Builder for [`Interpreter`].
///
/// Handlers registered with `command`/`control`/`expansion` are searched in
/// registration order. Whole containers added with the `*_container` methods
/// are searched after them, in the order they were added.
pub struct InterpreterBuilder {
    commands: BaseCallHandlerContainer<()>,
    controls: BaseCallHandlerContainer<()>,
    expansions: BaseCallHandlerContainer<String>,
    command_containers: Vec<SharedContainer<()>>,
    control_containers: Vec<SharedContainer<()>>,
    expansion_containers: Vec<SharedContainer<String>>,
    initializers: Vec<Box<dyn Initializer>>,
    context_factory: Option<Box<dyn Fn() -> InterpreterContext>>,
    triggers: ConsumeRestTriggers,
    statement_limit: usize,
    call_depth_limit: usize,
    max_nesting: usize,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            commands: BaseCallHandlerContainer::new(),
            controls: BaseCallHandlerContainer::new(),
            expansions: BaseCallHandlerContainer::new(),
            command_containers: Vec::new(),
            control_containers: Vec::new(),
            expansion_containers: Vec::new(),
            initializers: Vec::new(),
            context_factory: None,
            triggers: ConsumeRestTriggers::new(),
            statement_limit: 0,
            call_depth_limit: DEFAULT_CALL_DEPTH_LIMIT,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Maximum number of executed statements per context; 0 means unbounded.
    #[must_use]
    pub fn statement_limit(mut self, limit: usize) -> Self {
        self.statement_limit = limit;
        self
    }

    /// Maximum number of nested calls; 0 means unbounded.
    #[must_use]
    pub fn call_depth_limit(mut self, limit: usize) -> Self {
        self.call_depth_limit = limit;
        self
    }

    /// Maximum nesting of blocks, controls and expansions accepted by the parser.
    #[must_use]
    pub fn max_nesting(mut self, limit: usize) -> Self {
        self.max_nesting = limit;
        self
    }

    #[must_use]
    pub fn command(mut self, handler: impl CallHandler<()> + 'static) -> Self {
        self.commands.add(handler);
        self
    }

    #[must_use]
    pub fn control(mut self, handler: impl CallHandler<()> + 'static) -> Self {
        self.controls.add(handler);
        self
    }

    #[must_use]
    pub fn expansion(mut self, handler: impl CallHandler<String> + 'static) -> Self {
        self.expansions.add(handler);
        self
    }

    #[must_use]
    pub fn command_container(mut self, container: SharedContainer<()>) -> Self {
        self.command_containers.push(container);
        self
    }

    #[must_use]
    pub fn control_container(mut self, container: SharedContainer<()>) -> Self {
        self.control_containers.push(container);
        self
    }

    #[must_use]
    pub fn expansion_container(mut self, container: SharedContainer<String>) -> Self {
        self.expansion_containers.push(container);
        self
    }

    /// Run `init` on every context before script code runs in it.
    #[must_use]
    pub fn initializer(mut self, init: impl Initializer + 'static) -> Self {
        self.initializers.push(Box::new(init));
        self
    }

    /// Produce the context used when the caller does not supply one.
    #[must_use]
    pub fn context_factory(mut self, factory: impl Fn() -> InterpreterContext + 'static) -> Self {
        self.context_factory = Some(Box::new(factory));
        self
    }

    /// Consume-rest trigger applied to every parse done by the interpreter.
    #[must_use]
    pub fn consume_rest(mut self, call: impl Into<String>, index: usize) -> Self {
        self.triggers.insert(call, index);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            commands: compose(self.commands, self.command_containers),
            controls: compose(self.controls, self.control_containers),
            expansions: compose(self.expansions, self.expansion_containers),
            initializers: self.initializers,
            context_factory: self
                .context_factory
                .unwrap_or_else(|| Box::new(InterpreterContext::new)),
            triggers: self.triggers,
            statement_limit: self.statement_limit,
            call_depth_limit: self.call_depth_limit,
            max_nesting: self.max_nesting,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compose<T: 'static>(
    handlers: BaseCallHandlerContainer<T>,
    containers: Vec<SharedContainer<T>>,
) -> SharedContainer<T> {
    let handlers = Rc::new(handlers) as SharedContainer<T>;
    if containers.is_empty() {
        return handlers;
    }
    let mut choice = ChoiceCallHandlerContainer::new().with(handlers);
    for container in containers {
        choice.push(container);
    }
    Rc::new(choice)
}
