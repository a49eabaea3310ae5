//! RAII guard for variable scopes.
//!
//! [`ScopedContext`] opens a scope on creation and destroys it on drop, also
//! during unwinding or an early `?` return. It derefs to the context, so the
//! guarded code uses it exactly like `&mut InterpreterContext`:
//!
//! ```text
//! let mut scope = ctx.scoped();
//! scope.vars_mut().set_var("x", "1");
//! interp.interpret_statement(&mut scope, body)?;
//! // scope destroyed here
//! ```

use std::ops::{Deref, DerefMut};

use super::InterpreterContext;

pub struct ScopedContext<'ctx> {
    ctx: &'ctx mut InterpreterContext,
}

impl<'ctx> ScopedContext<'ctx> {
    pub(super) fn new(ctx: &'ctx mut InterpreterContext) -> Self {
        ctx.vars_mut().new_scope();
        ScopedContext { ctx }
    }
}

impl Drop for ScopedContext<'_> {
    fn drop(&mut self) {
        self.ctx.vars_mut().destroy_scope();
    }
}

impl Deref for ScopedContext<'_> {
    type Target = InterpreterContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for ScopedContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}
