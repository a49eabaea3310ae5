//! Per-call records kept on the interpreter's call stack.

use std::fmt;

use quill_ir::NodeRef;

use crate::errors::BacktraceFrame;

/// Maps each flattened argument index to the node it was produced by.
///
/// One node may produce several arguments (a spread expansion, or the extra
/// words of an expanded call name), so the map is built a node at a time.
#[derive(Clone, Debug, Default)]
pub struct ArgSourceMap {
    nodes: Vec<NodeRef>,
}

impl ArgSourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the next `count` arguments came from `source`.
    pub fn add_args(&mut self, count: usize, source: &NodeRef) {
        self.nodes
            .extend(std::iter::repeat_with(|| NodeRef::clone(source)).take(count));
    }

    pub fn get(&self, index: usize) -> Option<&NodeRef> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Everything a handler needs to know about the call it is serving.
#[derive(Clone, Debug)]
pub struct CallContext {
    name: String,
    args: Vec<String>,
    arg_nodes: ArgSourceMap,
    control_node: Option<NodeRef>,
    return_value: Option<String>,
    runtime_call: bool,
    else_signal: bool,
}

impl CallContext {
    pub fn new(
        name: impl Into<String>,
        args: Vec<String>,
        arg_nodes: ArgSourceMap,
        control_node: Option<NodeRef>,
    ) -> Self {
        CallContext {
            name: name.into(),
            args,
            arg_nodes,
            control_node,
            return_value: None,
            runtime_call: false,
            else_signal: false,
        }
    }

    /// Frame with no arguments, as used for the base of the call stack.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), ArgSourceMap::new(), None)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg_nodes(&self) -> &ArgSourceMap {
        &self.arg_nodes
    }

    /// The governed statement, for control calls.
    pub fn control_node(&self) -> Option<&NodeRef> {
        self.control_node.as_ref()
    }

    pub fn return_value(&self) -> Option<&str> {
        self.return_value.as_deref()
    }

    pub fn set_return_value(&mut self, value: impl Into<String>) {
        self.return_value = Some(value.into());
    }

    pub fn take_return_value(&mut self) -> Option<String> {
        self.return_value.take()
    }

    /// Whether this call was defined by the script while it ran.
    pub fn is_runtime_call(&self) -> bool {
        self.runtime_call
    }

    pub fn mark_runtime_call(&mut self) {
        self.runtime_call = true;
    }

    pub fn else_signal(&self) -> bool {
        self.else_signal
    }

    pub fn set_else_signal(&mut self, signal: bool) {
        self.else_signal = signal;
    }

    pub fn flags(&self) -> String {
        let mut flags = String::with_capacity(3);
        flags.push(if self.control_node.is_some() { '!' } else { '-' });
        flags.push(if self.else_signal { 'e' } else { '-' });
        flags.push(if self.runtime_call { 'r' } else { '-' });
        flags
    }

    /// Quoted name followed by quoted arguments.
    pub fn name_and_args(&self) -> String {
        use std::fmt::Write;

        let mut out = format!("{:?}", self.name);
        for arg in &self.args {
            let _ = write!(out, " {arg:?}");
        }
        out
    }

    pub fn trace_frame(&self) -> BacktraceFrame {
        BacktraceFrame {
            flags: self.flags(),
            call: self.name_and_args(),
        }
    }
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {}", self.flags(), self.name_and_args())
    }
}
