//! Calls defined by a script while it runs.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use quill_ir::NodeRef;
use rustc_hash::FxHashMap;

use crate::handler::{CallHandler, CallHandlerContainer, SharedHandler};
use crate::{EvalResult, Flow, Interpreter, InterpreterContext};

/// Converts a runtime call's return slot into the namespace's result type.
pub trait ReturnValue: Sized {
    fn from_return(value: Option<String>) -> Self;
}

impl ReturnValue for () {
    fn from_return(_: Option<String>) -> Self {}
}

impl ReturnValue for String {
    fn from_return(value: Option<String>) -> Self {
        value.unwrap_or_default()
    }
}

/// A script-defined call: a body and its parameter names.
///
/// A final parameter written `*name` collects all remaining arguments,
/// joined by single spaces.
#[derive(Clone, Debug)]
pub struct RuntimeCall {
    name: String,
    body: NodeRef,
    params: Vec<String>,
}

impl RuntimeCall {
    pub fn new(name: impl Into<String>, body: NodeRef, params: Vec<String>) -> Self {
        RuntimeCall {
            name: name.into(),
            body,
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &NodeRef {
        &self.body
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Pair parameters with arguments, checking arity.
    pub fn bind(&self, args: &[String]) -> Result<Vec<(String, String)>, String> {
        if let Some((last, fixed)) = self.params.split_last() {
            if let Some(collect) = last.strip_prefix('*') {
                if args.len() < fixed.len() {
                    return Err(format!(
                        "{}: expected at least {} arguments, got {}",
                        self.name,
                        fixed.len(),
                        args.len()
                    ));
                }
                let mut bound: Vec<(String, String)> =
                    fixed.iter().cloned().zip(args.iter().cloned()).collect();
                bound.push((collect.to_owned(), args[fixed.len()..].join(" ")));
                return Ok(bound);
            }
        }

        if args.len() != self.params.len() {
            return Err(format!(
                "{}: expected {} arguments, got {}",
                self.name,
                self.params.len(),
                args.len()
            ));
        }
        Ok(self.params.iter().cloned().zip(args.iter().cloned()).collect())
    }
}

impl<T: ReturnValue> CallHandler<T> for RuntimeCall {
    fn handles(&self, name: &str) -> bool {
        self.name == name
    }

    /// Run the body in a fresh variable scope. A `return` inside the body
    /// ends the call and fills its return slot.
    fn handle_call(
        &self,
        interp: &Interpreter,
        ctx: &mut InterpreterContext,
    ) -> EvalResult<Flow<T>> {
        let bindings = match self.bind(ctx.args()) {
            Ok(bindings) => bindings,
            Err(message) => return Err(ctx.handler_error(message)),
        };
        ctx.call_context_mut().mark_runtime_call();

        let flow = {
            let mut scope = ctx.scoped();
            for (param, value) in bindings {
                scope.vars_mut().set_var(param, value);
            }
            interp.interpret_statement(&mut scope, &self.body)?
        };

        match flow {
            Flow::Continue(()) => {}
            Flow::Return(value) => ctx.call_context_mut().set_return_value(value),
            Flow::Stop => return Ok(Flow::Stop),
        }
        let value = ctx.call_context_mut().take_return_value();
        Ok(Flow::Continue(T::from_return(value)))
    }
}

/// Registry of runtime calls for one namespace.
///
/// Definitions happen while the registry is shared with the dispatch path,
/// so the map sits behind a `RefCell`; no borrow outlives a single method.
pub struct RuntimeCallHandler<T> {
    calls: RefCell<FxHashMap<String, Rc<RuntimeCall>>>,
    kind: PhantomData<fn() -> T>,
}

impl<T> RuntimeCallHandler<T> {
    pub fn new() -> Self {
        RuntimeCallHandler {
            calls: RefCell::new(FxHashMap::default()),
            kind: PhantomData,
        }
    }

    /// Define or redefine `name`.
    pub fn define(&self, name: impl Into<String>, body: NodeRef, params: Vec<String>) {
        let name = name.into();
        let call = Rc::new(RuntimeCall::new(name.clone(), body, params));
        self.calls.borrow_mut().insert(name, call);
    }

    pub fn undefine(&self, name: &str) -> bool {
        self.calls.borrow_mut().remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Rc<RuntimeCall>> {
        self.calls.borrow().get(name).cloned()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.calls.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

impl<T> Default for RuntimeCallHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ReturnValue + 'static> CallHandlerContainer<T> for RuntimeCallHandler<T> {
    fn get_for_call(&self, name: &str) -> Option<SharedHandler<T>> {
        self.get(name).map(|call| call as SharedHandler<T>)
    }
}
