//! Non-error control signals.
//!
//! `stop` and `return` unwind evaluation without being failures. Every level of
//! statement, block and call evaluation returns a [`Flow`] and its caller
//! decides whether to keep going; [`proceed!`](crate::proceed) does that for
//! the common case of propagating anything but `Continue`.

/// Result of evaluating something that may be interrupted by `stop` or `return`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow<T = ()> {
    /// Evaluation finished normally with a value.
    Continue(T),
    /// A `return` is unwinding to the nearest runtime call.
    Return(String),
    /// The script asked to stop; unwinds to the top of the run.
    Stop,
}

impl<T> Flow<T> {
    pub fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flow<U> {
        match self {
            Flow::Continue(value) => Flow::Continue(f(value)),
            Flow::Return(value) => Flow::Return(value),
            Flow::Stop => Flow::Stop,
        }
    }
}

impl Flow<()> {
    pub const CONTINUE: Flow<()> = Flow::Continue(());
}

/// Unwrap [`Flow::Continue`], or return the interrupting signal from the
/// enclosing function as `Ok(..)`.
#[macro_export]
macro_rules! proceed {
    ($flow:expr) => {
        match $flow {
            $crate::Flow::Continue(value) => value,
            $crate::Flow::Return(value) => return Ok($crate::Flow::Return(value)),
            $crate::Flow::Stop => return Ok($crate::Flow::Stop),
        }
    };
}
