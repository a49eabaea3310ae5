//! Mutable state of one script run.

use std::any::Any;
use std::rc::Rc;

use quill_ir::NodeRef;
use rustc_hash::FxHashMap;

use crate::errors::{Backtrace, EvalError, EvalErrorKind};
use crate::handler::{ChoiceCallHandlerContainer, SharedContainer, UnifiedObserver};
use crate::runtime::RuntimeCallHandler;
use crate::{CallContext, ScopedVarStore};

mod scope_guard;

pub use scope_guard::ScopedContext;

/// Name of the frame at the bottom of every call stack.
pub const MAIN_CALL: &str = "__main__";

/// Everything that changes while a script runs: the node being evaluated,
/// the call stack, variables, the statement counter, runtime-defined calls
/// and resources owned by handlers.
///
/// A context is bound to an [`Interpreter`](crate::Interpreter) by
/// [`Interpreter::init_context`](crate::Interpreter::init_context), which
/// layers the interpreter's built-in handlers behind the context's
/// runtime-defined ones.
pub struct InterpreterContext {
    current_node: Option<NodeRef>,
    call_stack: Vec<CallContext>,
    vars: ScopedVarStore,
    statement_count: usize,
    runtime_commands: Rc<RuntimeCallHandler<()>>,
    runtime_expansions: Rc<RuntimeCallHandler<String>>,
    commands: ChoiceCallHandlerContainer<()>,
    controls: ChoiceCallHandlerContainer<()>,
    expansions: ChoiceCallHandlerContainer<String>,
    resources: FxHashMap<u64, Box<dyn Any>>,
    next_resource: u64,
    host_data: Option<Box<dyn Any>>,
    unified_commands: bool,
    unified_observer: Option<UnifiedObserver>,
    bound: bool,
}

impl InterpreterContext {
    pub fn new() -> Self {
        let runtime_commands = Rc::new(RuntimeCallHandler::new());
        let runtime_expansions = Rc::new(RuntimeCallHandler::new());
        InterpreterContext {
            current_node: None,
            call_stack: vec![CallContext::named(MAIN_CALL)],
            vars: ScopedVarStore::new(),
            statement_count: 0,
            commands: ChoiceCallHandlerContainer::new()
                .with(Rc::clone(&runtime_commands) as SharedContainer<()>),
            controls: ChoiceCallHandlerContainer::new(),
            expansions: ChoiceCallHandlerContainer::new()
                .with(Rc::clone(&runtime_expansions) as SharedContainer<String>),
            runtime_commands,
            runtime_expansions,
            resources: FxHashMap::default(),
            next_resource: 0,
            host_data: None,
            unified_commands: false,
            unified_observer: None,
            bound: false,
        }
    }

    /// Layer built-in containers behind this context's runtime calls.
    pub fn bind_handlers(
        &mut self,
        commands: SharedContainer<()>,
        controls: SharedContainer<()>,
        expansions: SharedContainer<String>,
    ) {
        self.commands = ChoiceCallHandlerContainer::new()
            .with(Rc::clone(&self.runtime_commands) as SharedContainer<()>)
            .with(commands);
        self.controls = ChoiceCallHandlerContainer::new().with(controls);
        self.expansions = ChoiceCallHandlerContainer::new()
            .with(Rc::clone(&self.runtime_expansions) as SharedContainer<String>)
            .with(expansions);
        self.bound = true;
    }

    /// Whether [`bind_handlers`](Self::bind_handlers) has run.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Reset the call stack to the single base frame.
    pub fn set_base_call(&mut self) {
        self.call_stack.clear();
        self.call_stack.push(CallContext::named(MAIN_CALL));
    }

    // --- position ---

    pub fn current_node(&self) -> Option<&NodeRef> {
        self.current_node.as_ref()
    }

    pub fn set_current_node(&mut self, node: &NodeRef) {
        self.current_node = Some(NodeRef::clone(node));
    }

    // --- call stack ---

    pub fn call_stack(&self) -> &[CallContext] {
        &self.call_stack
    }

    /// The innermost call.
    pub fn call_context(&self) -> &CallContext {
        &self.call_stack[self.call_stack.len() - 1]
    }

    pub fn call_context_mut(&mut self) -> &mut CallContext {
        let last = self.call_stack.len() - 1;
        &mut self.call_stack[last]
    }

    /// The call enclosing the current one. Conditionals use it to pass the
    /// else-signal to their siblings.
    pub fn parent_call_context(&self) -> Option<&CallContext> {
        let len = self.call_stack.len();
        if len < 2 {
            return None;
        }
        self.call_stack.get(len - 2)
    }

    pub fn parent_call_context_mut(&mut self) -> Option<&mut CallContext> {
        let len = self.call_stack.len();
        if len < 2 {
            return None;
        }
        self.call_stack.get_mut(len - 2)
    }

    /// Number of active calls, not counting the base frame.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len() - 1
    }

    pub fn push_call(&mut self, call: CallContext) {
        self.call_stack.push(call);
    }

    /// # Panics
    ///
    /// Panics if only the base frame is left.
    pub fn pop_call(&mut self) -> CallContext {
        assert!(
            self.call_stack.len() > 1,
            "InterpreterContext::pop_call called with only the base frame left"
        );
        let last = self.call_stack.len() - 1;
        self.call_stack.remove(last)
    }

    /// Whether any active frame is a runtime call.
    pub fn in_runtime_call(&self) -> bool {
        self.call_stack.iter().any(CallContext::is_runtime_call)
    }

    pub fn call_name(&self) -> &str {
        self.call_context().name()
    }

    pub fn args(&self) -> &[String] {
        self.call_context().args()
    }

    /// Node the argument at `index` came from.
    pub fn arg_node(&self, index: usize) -> Option<&NodeRef> {
        self.call_context().arg_nodes().get(index)
    }

    pub fn control_node(&self) -> Option<&NodeRef> {
        self.call_context().control_node()
    }

    // --- variables ---

    pub fn vars(&self) -> &ScopedVarStore {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut ScopedVarStore {
        &mut self.vars
    }

    pub fn get_var(&self, name: &str) -> Option<&str> {
        self.vars.get_var(name)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.set_var(name, value);
    }

    pub fn del_var(&mut self, name: &str) -> Option<String> {
        self.vars.del_var(name)
    }

    /// Open a variable scope that closes when the guard drops.
    pub fn scoped(&mut self) -> ScopedContext<'_> {
        ScopedContext::new(self)
    }

    // --- statements ---

    pub fn statement_count(&self) -> usize {
        self.statement_count
    }

    pub(crate) fn count_statement(&mut self) -> usize {
        self.statement_count += 1;
        self.statement_count
    }

    // --- handlers ---

    pub fn runtime_commands(&self) -> &RuntimeCallHandler<()> {
        &self.runtime_commands
    }

    pub fn runtime_expansions(&self) -> &RuntimeCallHandler<String> {
        &self.runtime_expansions
    }

    /// Runtime commands, then built-in ones.
    pub fn commands(&self) -> &ChoiceCallHandlerContainer<()> {
        &self.commands
    }

    pub fn controls(&self) -> &ChoiceCallHandlerContainer<()> {
        &self.controls
    }

    /// Runtime expansions, then built-in ones.
    pub fn expansions(&self) -> &ChoiceCallHandlerContainer<String> {
        &self.expansions
    }

    // --- errors ---

    pub fn backtrace(&self) -> Backtrace {
        Backtrace::new(self.call_stack.iter().map(CallContext::trace_frame).collect())
    }

    /// Attach the current position (unless already set) and a backtrace.
    pub fn raise(&self, error: EvalError) -> EvalError {
        let error = match (error.pos, &self.current_node) {
            (None, Some(node)) => error.at(node.pos()),
            _ => error,
        };
        error.with_backtrace(self.backtrace())
    }

    pub fn error(&self, kind: EvalErrorKind) -> EvalError {
        self.raise(EvalError::new(kind))
    }

    pub fn handler_error(&self, message: impl Into<String>) -> EvalError {
        self.raise(EvalError::handler(message))
    }

    /// Handler error positioned at the node argument `index` came from.
    pub fn arg_error(&self, index: usize, message: impl Into<String>) -> EvalError {
        let error = EvalError::handler(message);
        let error = match self.arg_node(index) {
            Some(node) => error.at(node.pos()),
            None => error,
        };
        self.raise(error)
    }

    // --- resources ---

    /// Store a handler-owned resource and return its handle.
    pub fn insert_resource<R: Any>(&mut self, resource: R) -> u64 {
        let id = self.next_resource;
        self.next_resource += 1;
        self.resources.insert(id, Box::new(resource));
        id
    }

    pub fn resource<R: Any>(&self, id: u64) -> Option<&R> {
        self.resources.get(&id)?.downcast_ref()
    }

    pub fn resource_mut<R: Any>(&mut self, id: u64) -> Option<&mut R> {
        self.resources.get_mut(&id)?.downcast_mut()
    }

    /// Drop the resource behind `id`. Returns false if there was none.
    pub fn close_resource(&mut self, id: u64) -> bool {
        self.resources.remove(&id).is_some()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    // --- unified commands ---

    /// Let command calls with no command handler fall back to an expansion
    /// of the same name, discarding its result.
    pub fn enable_unified_commands(&mut self) {
        self.unified_commands = true;
    }

    pub fn unified_commands(&self) -> bool {
        self.unified_commands
    }

    /// Receive the result of every expansion run in command position.
    pub fn set_unified_observer(&mut self, observer: UnifiedObserver) {
        self.unified_observer = Some(observer);
    }

    pub fn unified_observer(&self) -> Option<UnifiedObserver> {
        self.unified_observer.clone()
    }

    // --- host data ---

    pub fn set_host_data<D: Any>(&mut self, data: D) {
        self.host_data = Some(Box::new(data));
    }

    pub fn host_data<D: Any>(&self) -> Option<&D> {
        self.host_data.as_ref()?.downcast_ref()
    }

    pub fn host_data_mut<D: Any>(&mut self) -> Option<&mut D> {
        self.host_data.as_mut()?.downcast_mut()
    }
}

impl Default for InterpreterContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
