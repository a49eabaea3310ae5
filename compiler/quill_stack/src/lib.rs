//! Stack growth guard for deep recursion.
//!
//! Script nesting is user-controlled: a block inside a block inside a control
//! call, a runtime call re-entering the interpreter, an expansion whose name is
//! itself an expansion. Both the parser and the interpreter recurse once per
//! nesting level, so every recursive entry point is wrapped in
//! [`ensure_sufficient_stack`] to keep the host thread alive regardless of how
//! the configured call-depth and nesting ceilings are set.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: plain passthrough.

/// If less than this remains, the stack is grown before recursing (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
///
/// ```text
/// fn interpret_block(&self, ctx: &mut InterpreterContext, node: &AstNode) -> EvalResult<Flow> {
///     ensure_sufficient_stack(|| {
///         // ... recurse into child statements ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: no growth, call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
