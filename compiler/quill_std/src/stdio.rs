//! Console commands. Each one writes to or reads from the [`Console`] it was
//! built with, so hosts decide where script I/O goes.

use std::sync::Arc;

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::console::{Console, SharedConsole};

fn input(console: &Console, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    let Some(name) = ctx.args().first().cloned() else {
        return Err(ctx.handler_error("input: variable name is not specified"));
    };
    match console.read_line() {
        Ok(Some(line)) => {
            ctx.set_var(name, line);
            Ok(Flow::CONTINUE)
        }
        Ok(None) => Err(ctx.handler_error("input: end of input")),
        Err(e) => Err(ctx.handler_error(format!("input: {e}"))),
    }
}

/// `print`, `write` and `input`.
pub fn commands(console: &SharedConsole) -> CallbackCallHandler<()> {
    let (out, partial, source) = (Arc::clone(console), Arc::clone(console), Arc::clone(console));
    CallbackCallHandler::new()
        .with_call("print", move |_, ctx| {
            out.println(&ctx.args().join(" "));
            Ok(Flow::CONTINUE)
        })
        .with_call("write", move |_, ctx| {
            partial.print(&ctx.args().join(" "));
            Ok(Flow::CONTINUE)
        })
        .with_call("input", move |_, ctx| input(&source, ctx))
}

/// `backtrace` prints the live call stack. Hosts that expose scripts to
/// untrusted users can leave it out.
pub fn debug_commands(console: &SharedConsole) -> CallbackCallHandler<()> {
    let console = Arc::clone(console);
    CallbackCallHandler::new().with_call("backtrace", move |_, ctx| {
        console.print(&ctx.backtrace().to_string());
        Ok(Flow::CONTINUE)
    })
}
