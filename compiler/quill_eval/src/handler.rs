//! Call handlers and the registries that resolve call names to them.
//!
//! Commands, controls and expansions each live in their own namespace. A
//! handler answers [`CallHandler::handles`] for the names it serves; a
//! [`CallHandlerContainer`] finds the handler for a name. Containers compose:
//! a [`ChoiceCallHandlerContainer`] asks each member in turn, which is how
//! script-defined calls shadow the built-in set.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{proceed, EvalError, EvalResult, Flow, Interpreter, InterpreterContext};

/// Something that can serve a call.
///
/// `T` is `()` for commands and controls and `String` for expansions.
/// The active [`CallContext`](crate::CallContext) is on top of the context's
/// call stack when `handle_call` runs.
pub trait CallHandler<T> {
    fn handles(&self, name: &str) -> bool;

    fn handle_call(&self, interp: &Interpreter, ctx: &mut InterpreterContext)
        -> EvalResult<Flow<T>>;
}

pub type SharedHandler<T> = Rc<dyn CallHandler<T>>;

/// Name-keyed lookup of call handlers.
pub trait CallHandlerContainer<T> {
    fn get_for_call(&self, name: &str) -> Option<SharedHandler<T>>;

    fn contains(&self, name: &str) -> bool {
        self.get_for_call(name).is_some()
    }
}

pub type SharedContainer<T> = Rc<dyn CallHandlerContainer<T>>;

/// Ordered list of handlers; the first one that handles a name wins.
pub struct BaseCallHandlerContainer<T> {
    handlers: Vec<SharedHandler<T>>,
}

impl<T> BaseCallHandlerContainer<T> {
    pub fn new() -> Self {
        BaseCallHandlerContainer {
            handlers: Vec::new(),
        }
    }

    pub fn add(&mut self, handler: impl CallHandler<T> + 'static) {
        self.handlers.push(Rc::new(handler));
    }

    pub fn add_shared(&mut self, handler: SharedHandler<T>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for BaseCallHandlerContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallHandlerContainer<T> for BaseCallHandlerContainer<T> {
    fn get_for_call(&self, name: &str) -> Option<SharedHandler<T>> {
        self.handlers.iter().find(|h| h.handles(name)).cloned()
    }
}

/// Several containers searched in order.
pub struct ChoiceCallHandlerContainer<T> {
    containers: Vec<SharedContainer<T>>,
}

impl<T> ChoiceCallHandlerContainer<T> {
    pub fn new() -> Self {
        ChoiceCallHandlerContainer {
            containers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, container: SharedContainer<T>) -> Self {
        self.containers.push(container);
        self
    }

    pub fn push(&mut self, container: SharedContainer<T>) {
        self.containers.push(container);
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

impl<T> Default for ChoiceCallHandlerContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallHandlerContainer<T> for ChoiceCallHandlerContainer<T> {
    fn get_for_call(&self, name: &str) -> Option<SharedHandler<T>> {
        self.containers.iter().find_map(|c| c.get_for_call(name))
    }
}

pub type Callback<T> = dyn Fn(&Interpreter, &mut InterpreterContext) -> EvalResult<Flow<T>>;

/// A handler backed by one closure per call name, with aliases.
pub struct CallbackCallHandler<T> {
    calls: FxHashMap<String, Rc<Callback<T>>>,
    aliases: FxHashMap<String, String>,
}

impl<T> CallbackCallHandler<T> {
    pub fn new() -> Self {
        CallbackCallHandler {
            calls: FxHashMap::default(),
            aliases: FxHashMap::default(),
        }
    }

    pub fn add_call<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&Interpreter, &mut InterpreterContext) -> EvalResult<Flow<T>> + 'static,
    {
        self.calls.insert(name.into(), Rc::new(callback));
    }

    #[must_use]
    pub fn with_call<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Interpreter, &mut InterpreterContext) -> EvalResult<Flow<T>> + 'static,
    {
        self.add_call(name, callback);
        self
    }

    /// Make `alias` resolve to the call registered as `name`.
    pub fn add_alias(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.aliases.insert(alias.into(), name.into());
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_alias(alias, name);
        self
    }

    /// Remove a call together with every alias pointing at it.
    pub fn remove_call(&mut self, name: &str) -> bool {
        self.aliases.retain(|_, target| target != name);
        self.calls.remove(name).is_some()
    }

    pub fn remove_alias(&mut self, alias: &str) -> bool {
        self.aliases.remove(alias).is_some()
    }

    /// The callback for `name`, following one level of aliasing.
    pub fn get_callback(&self, name: &str) -> Option<&Rc<Callback<T>>> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.calls.get(name)
    }

    /// Registered call names, excluding aliases.
    pub fn call_names(&self) -> impl Iterator<Item = &str> {
        self.calls.keys().map(String::as_str)
    }
}

impl<T> Default for CallbackCallHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallHandler<T> for CallbackCallHandler<T> {
    fn handles(&self, name: &str) -> bool {
        self.get_callback(name).is_some()
    }

    fn handle_call(
        &self,
        interp: &Interpreter,
        ctx: &mut InterpreterContext,
    ) -> EvalResult<Flow<T>> {
        let Some(callback) = self.get_callback(ctx.call_name()) else {
            let message = format!("no callback registered for {:?}", ctx.call_name());
            return Err(ctx.raise(EvalError::internal(message)));
        };
        callback(interp, ctx)
    }
}

/// Sees each expansion result produced in command position.
pub type UnifiedObserver = Rc<dyn Fn(&InterpreterContext, &str)>;

/// An expansion answering a command call once unified commands are on.
pub struct ExpansionAsCommand {
    expansion: SharedHandler<String>,
}

impl ExpansionAsCommand {
    pub fn new(expansion: SharedHandler<String>) -> Self {
        ExpansionAsCommand { expansion }
    }
}

impl CallHandler<()> for ExpansionAsCommand {
    fn handles(&self, name: &str) -> bool {
        self.expansion.handles(name)
    }

    fn handle_call(&self, interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
        let result = proceed!(self.expansion.handle_call(interp, ctx)?);
        if let Some(observer) = ctx.unified_observer() {
            observer(ctx, &result);
        }
        Ok(Flow::CONTINUE)
    }
}

/// Seeds per-run state before any script code runs.
pub trait Initializer {
    fn initialize(&self, ctx: &mut InterpreterContext) -> EvalResult<()>;
}

impl<F> Initializer for F
where
    F: Fn(&mut InterpreterContext) -> EvalResult<()>,
{
    fn initialize(&self, ctx: &mut InterpreterContext) -> EvalResult<()> {
        self(ctx)
    }
}
